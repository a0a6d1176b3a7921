//! Ordering and replay behaviour of conversations under concurrent writers.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use gigline_db::models::project::Project;
use gigline_db::MemoryStore;
use gigline_events::{DeliveryRelay, EventBus, NotificationRouter};
use gigline_messaging::MessageChannel;

async fn channel() -> Arc<MessageChannel> {
    let store = Arc::new(MemoryStore::new());
    for id in ["proj-1", "proj-2"] {
        store
            .put_project(Project {
                id: id.into(),
                title: format!("Project {id}"),
                client_id: Some("A".into()),
                freelancer_id: Some("B".into()),
            })
            .await;
    }
    let (relay, _queue) = DeliveryRelay::channel();
    let bus = Arc::new(EventBus::with_router(NotificationRouter::new(
        store.clone(),
        store.clone(),
        relay,
    )));
    Arc::new(MessageChannel::new(store, bus))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn subscribers_observe_commit_order_under_concurrent_sends() {
    const WRITERS: usize = 8;
    const PER_WRITER: usize = 25;
    const TOTAL: usize = WRITERS * PER_WRITER;

    let channel = channel().await;
    let mut subscribers = Vec::new();
    for _ in 0..3 {
        subscribers.push(channel.open_channel("proj-1").await);
    }

    let mut writers = Vec::new();
    for w in 0..WRITERS {
        let channel = Arc::clone(&channel);
        writers.push(tokio::spawn(async move {
            let (sender, recipient) = if w % 2 == 0 { ("A", "B") } else { ("B", "A") };
            for i in 0..PER_WRITER {
                channel
                    .send_message("proj-1", sender, recipient, &format!("w{w}-{i}"))
                    .await
                    .unwrap();
            }
        }));
    }
    for writer in writers {
        writer.await.unwrap();
    }

    let committed = channel
        .history("proj-1", None, Some(TOTAL as i64))
        .await
        .unwrap();
    assert_eq!(committed.len(), TOTAL);
    let commit_order: Vec<_> = committed.iter().map(|m| m.id).collect();

    for sub in &mut subscribers {
        let mut observed = Vec::with_capacity(TOTAL);
        while observed.len() < TOTAL {
            let message = tokio::time::timeout(Duration::from_secs(5), sub.recv())
                .await
                .expect("subscriber stalled")
                .expect("subscription closed early");
            observed.push(message);
        }

        let sequences: Vec<_> = observed.iter().map(|m| m.sequence_number).collect();
        let expected: Vec<_> = (1..=TOTAL as i64).collect();
        assert_eq!(sequences, expected);
        assert_eq!(observed.iter().map(|m| m.id).collect::<Vec<_>>(), commit_order);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn conversations_are_independent() {
    let channel = channel().await;
    let mut sub2 = channel.open_channel("proj-2").await;

    let c1 = Arc::clone(&channel);
    let c2 = Arc::clone(&channel);
    let (r1, r2) = tokio::join!(
        tokio::spawn(async move {
            for i in 0..10 {
                c1.send_message("proj-1", "A", "B", &format!("one-{i}"))
                    .await
                    .unwrap();
            }
        }),
        tokio::spawn(async move {
            for i in 0..10 {
                c2.send_message("proj-2", "A", "B", &format!("two-{i}"))
                    .await
                    .unwrap();
            }
        }),
    );
    r1.unwrap();
    r2.unwrap();

    for expected in 1..=10 {
        let message = sub2.recv().await.unwrap();
        assert_eq!(message.conversation_id, "proj-2");
        assert_eq!(message.sequence_number, expected);
    }
    assert!(sub2.try_recv().is_none());

    let last = channel.history("proj-1", Some(9), None).await.unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].sequence_number, 10);
}

#[tokio::test]
async fn join_replays_backlog_then_streams_live() {
    let channel = channel().await;
    for i in 1..=3 {
        channel
            .send_message("proj-1", "A", "B", &format!("m{i}"))
            .await
            .unwrap();
    }

    let mut feed = channel.join("proj-1", Some(1)).await.unwrap();
    channel.send_message("proj-1", "B", "A", "m4").await.unwrap();

    let mut contents = Vec::new();
    for _ in 0..3 {
        contents.push(feed.next().await.unwrap().content);
    }
    assert_eq!(contents, vec!["m2", "m3", "m4"]);
    assert_eq!(feed.last_sequence(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn join_during_concurrent_sends_has_no_gaps_or_duplicates() {
    const TOTAL: i64 = 60;
    let channel = channel().await;

    let writer = {
        let channel = Arc::clone(&channel);
        tokio::spawn(async move {
            for i in 0..TOTAL {
                channel
                    .send_message("proj-1", "A", "B", &format!("m{i}"))
                    .await
                    .unwrap();
            }
        })
    };

    tokio::time::sleep(Duration::from_millis(2)).await;
    let mut feed = channel.join("proj-1", None).await.unwrap();
    writer.await.unwrap();

    let mut sequences = Vec::new();
    while sequences.len() < TOTAL as usize {
        let message = tokio::time::timeout(Duration::from_secs(5), feed.next_message())
            .await
            .expect("feed stalled")
            .expect("feed closed early");
        sequences.push(message.sequence_number);
    }
    assert_eq!(sequences, (1..=TOTAL).collect::<Vec<_>>());
}

#[tokio::test]
async fn rejoin_after_disconnect_resumes_from_last_seen() {
    let channel = channel().await;
    let mut first = channel.join("proj-1", None).await.unwrap();
    channel.send_message("proj-1", "A", "B", "m1").await.unwrap();
    let seen = first.next_message().await.unwrap();
    channel.close_channel(first.handle()).await;

    channel.send_message("proj-1", "A", "B", "m2").await.unwrap();

    let mut second = channel
        .join("proj-1", Some(seen.sequence_number))
        .await
        .unwrap();
    let resumed = second.next_message().await.unwrap();
    assert_eq!(resumed.content, "m2");
    assert_ne!(resumed.id, seen.id);
}
