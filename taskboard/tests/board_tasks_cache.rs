//! Per-board task cache and last-started-wins ordering

mod common;

use common::{context_with, sample_board, FakeApi};
use std::time::Duration;
use taskboard::BoardTaskSync;
use taskboard_client::types::{BoardId, ColumnId, CreateTaskInput, Task, TaskId, TaskPatch};

#[test_log::test(tokio::test)]
async fn test_second_load_is_served_from_cache() {
    let ctx = context_with(vec![sample_board()]);
    let api = FakeApi::new();
    api.reply_board_tasks(
        "b1",
        Duration::ZERO,
        vec![Task::new("t1", "b1", "col-plan", "Outline")],
    );
    let sync = BoardTaskSync::new(ctx, api.clone());
    let b1 = BoardId::from("b1");

    let first = sync.load_board_tasks(&b1, false).await;
    assert!(first.success);
    assert!(!first.from_cache);

    let second = sync.load_board_tasks(&b1, false).await;
    assert!(second.success);
    assert!(second.from_cache);
    assert_eq!(second.data.unwrap().len(), 1);
    assert_eq!(api.count_of("get_board_tasks"), 1);

    sync.clear_board_tasks_cache(Some(&b1));
    sync.clear_board_tasks_cache(Some(&b1));
    let third = sync.load_board_tasks(&b1, false).await;
    assert!(!third.from_cache);
    assert_eq!(api.count_of("get_board_tasks"), 2);
}

#[test_log::test(tokio::test)]
async fn test_force_reload_bypasses_cache() {
    let ctx = context_with(vec![sample_board()]);
    let api = FakeApi::new();
    let sync = BoardTaskSync::new(ctx, api.clone());
    let b1 = BoardId::from("b1");

    sync.load_board_tasks(&b1, false).await;
    let forced = sync.load_board_tasks(&b1, true).await;

    assert!(!forced.from_cache);
    assert_eq!(api.count_of("get_board_tasks"), 2);
}

#[test_log::test(tokio::test)]
async fn test_clearing_all_boards() {
    let mut second = sample_board();
    second.id = BoardId::from("b2");
    for column in second.columns.iter_mut() {
        column.id = ColumnId::from(format!("b2-{}", column.id));
    }
    let ctx = context_with(vec![sample_board(), second]);
    let sync = BoardTaskSync::new(ctx, FakeApi::new());
    let b1 = BoardId::from("b1");
    let b2 = BoardId::from("b2");

    sync.load_board_tasks(&b1, false).await;
    sync.load_board_tasks(&b2, false).await;
    assert_eq!(sync.cache().len(), 2);

    sync.clear_board_tasks_cache(None);
    sync.clear_board_tasks_cache(None);
    assert!(!sync.is_fresh(&b1));
    assert!(!sync.is_fresh(&b2));
}

#[test_log::test(tokio::test)]
async fn test_instances_keep_separate_caches() {
    let ctx = context_with(vec![sample_board()]);
    let api = FakeApi::new();
    let first = BoardTaskSync::new(ctx.clone(), api.clone());
    let second = BoardTaskSync::new(ctx, api.clone());
    let b1 = BoardId::from("b1");

    first.load_board_tasks(&b1, false).await;

    assert!(first.is_fresh(&b1));
    assert!(!second.is_fresh(&b1));
    assert!(!second.load_board_tasks(&b1, false).await.from_cache);
    assert_eq!(api.count_of("get_board_tasks"), 2);
}

#[test_log::test(tokio::test)]
async fn test_loaded_tasks_are_partitioned_by_column() {
    let ctx = context_with(vec![sample_board()]);
    let api = FakeApi::new();
    api.reply_board_tasks(
        "b1",
        Duration::ZERO,
        vec![
            Task::new("t2", "b1", "col-prog", "Second").with_order(1),
            Task::new("t1", "b1", "col-prog", "First"),
            Task::new("t3", "b1", "col-done", "Done"),
            Task::new("t4", "b1", "col-gone", "Orphan"),
        ],
    );
    let sync = BoardTaskSync::new(ctx.clone(), api);

    sync.load_board_tasks(&BoardId::from("b1"), false).await;

    let store = ctx.store().read().await;
    let progress = store.find_column(&ColumnId::from("col-prog")).unwrap();
    let ids: Vec<&str> = progress.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);
    assert!(store.find_task(&TaskId::from("t3")).is_some());
    assert!(store.find_task(&TaskId::from("t4")).is_none());

    let round_trip = store.board_tasks(&BoardId::from("b1")).unwrap();
    assert_eq!(round_trip.len(), 3);
}

#[test_log::test(tokio::test)]
async fn test_task_changes_invalidate_their_board() {
    let mut board = sample_board();
    board.columns[0].tasks = vec![Task::new("t1", "b1", "col-plan", "Outline")];
    let ctx = context_with(vec![board]);
    let api = FakeApi::new();
    for _ in 0..2 {
        api.reply_board_tasks(
            "b1",
            Duration::ZERO,
            vec![Task::new("t1", "b1", "col-plan", "Outline")],
        );
    }
    let sync = BoardTaskSync::new(ctx, api.clone());
    let b1 = BoardId::from("b1");
    let t1 = TaskId::from("t1");

    sync.load_board_tasks(&b1, false).await;
    assert!(sync.is_fresh(&b1));

    sync.update_task(&t1, &TaskPatch::new().with_title("Outline v2"))
        .await;
    assert!(!sync.is_fresh(&b1));

    // A rejected change leaves freshness alone
    sync.load_board_tasks(&b1, false).await;
    let rejected = sync.update_task(&t1, &TaskPatch::new().with_title("")).await;
    assert_eq!(rejected.error.as_deref(), Some("task title is required"));
    assert!(sync.is_fresh(&b1));
    assert_eq!(api.count_of("update_task"), 1);
}

#[test_log::test(tokio::test)]
async fn test_superseded_response_never_reaches_the_store() {
    let ctx = context_with(vec![sample_board()]);
    let api = FakeApi::new();
    api.reply_board_tasks(
        "b1",
        Duration::from_millis(200),
        vec![Task::new("t-old", "b1", "col-plan", "Stale")],
    );
    api.reply_board_tasks(
        "b1",
        Duration::ZERO,
        vec![Task::new("t-new", "b1", "col-prog", "Current")],
    );
    let sync = BoardTaskSync::new(ctx.clone(), api.clone());
    let b1 = BoardId::from("b1");

    let (older, newer) = tokio::join!(sync.load_board_tasks(&b1, true), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        sync.load_board_tasks(&b1, true).await
    });

    assert!(older.is_superseded());
    assert!(newer.success);
    assert!(sync.error().is_none());

    let store = ctx.store().read().await;
    assert!(store.find_task(&TaskId::from("t-old")).is_none());
    assert!(store.find_task(&TaskId::from("t-new")).is_some());
    assert!(sync.is_fresh(&b1));
}

#[test_log::test(tokio::test)]
async fn test_task_created_during_a_load_survives_it() {
    let ctx = context_with(vec![sample_board()]);
    let api = FakeApi::new();
    // The slow load was answered before the task existed
    api.reply_board_tasks("b1", Duration::from_millis(200), Vec::new());
    api.reply_board_tasks(
        "b1",
        Duration::ZERO,
        vec![Task::new("t1", "b1", "col-plan", "Book venue")],
    );
    let sync = BoardTaskSync::new(ctx.clone(), api.clone());
    let b1 = BoardId::from("b1");
    let t1 = TaskId::from("t1");

    let (load, created) = tokio::join!(sync.load_board_tasks(&b1, false), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        sync.create_task(&CreateTaskInput::new("Book venue", "b1", "col-plan"))
            .await
    });

    assert!(created.success);
    assert!(load.is_superseded());
    assert!(!sync.is_fresh(&b1));
    assert!(ctx.store().read().await.find_task(&t1).is_some());

    let next = sync.load_board_tasks(&b1, false).await;
    assert!(next.success);
    assert!(!next.from_cache);
    assert_eq!(api.count_of("get_board_tasks"), 2);
    assert!(ctx.store().read().await.find_task(&t1).is_some());
    assert!(sync.is_fresh(&b1));
}

#[test_log::test(tokio::test)]
async fn test_clearing_the_cache_discards_a_running_load() {
    let ctx = context_with(vec![sample_board()]);
    let api = FakeApi::new();
    api.reply_board_tasks(
        "b1",
        Duration::from_millis(100),
        vec![Task::new("t-old", "b1", "col-plan", "Stale")],
    );
    let sync = BoardTaskSync::new(ctx.clone(), api);
    let b1 = BoardId::from("b1");

    let (load, ()) = tokio::join!(sync.load_board_tasks(&b1, false), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        sync.clear_board_tasks_cache(None);
    });

    assert!(load.is_superseded());
    assert!(!sync.is_fresh(&b1));
    assert!(ctx
        .store()
        .read()
        .await
        .find_task(&TaskId::from("t-old"))
        .is_none());
}

#[test_log::test(tokio::test)]
async fn test_board_missing_from_the_store_is_still_cached() {
    let ctx = context_with(Vec::new());
    let api = FakeApi::new();
    api.reply_board_tasks(
        "b1",
        Duration::ZERO,
        vec![Task::new("t1", "b1", "col-plan", "Outline")],
    );
    let sync = BoardTaskSync::new(ctx.clone(), api.clone());
    let b1 = BoardId::from("b1");

    let first = sync.load_board_tasks(&b1, false).await;
    assert!(first.success);
    assert!(!first.from_cache);

    let second = sync.load_board_tasks(&b1, false).await;
    assert!(second.success);
    assert!(second.from_cache);
    let held = second.data.unwrap();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].id, TaskId::from("t1"));
    assert_eq!(api.count_of("get_board_tasks"), 1);
    assert!(ctx.store().read().await.boards().is_empty());
}
