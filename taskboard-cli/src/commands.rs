//! Command dispatch: each command runs one sync operation and prints its outcome

use crate::cli::{BoardAction, ColumnAction, Commands, TaskAction, TaskListArgs};
use anyhow::Result;
use serde::Serialize;
use taskboard::{BoardDeletion, SyncOutcome, Taskboard};
use taskboard_client::types::{
    BoardId, ColumnId, ColumnPatch, CommentInput, CreateBoardInput, CreateColumnInput,
    CreateTaskInput, MoveTaskInput, TaskFilter, TaskId,
};
use tracing::debug;

/// Print an outcome as JSON; returns whether it succeeded
fn emit<T: Serialize>(outcome: &SyncOutcome<T>) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(outcome.success)
}

pub async fn run(command: Commands, board: &Taskboard) -> Result<bool> {
    match command {
        Commands::Boards { action } => run_board(action, board).await,
        Commands::Columns { action } => run_column(action, board).await,
        Commands::Tasks { action } => run_task(action, board).await,
        Commands::Stats { kind } => emit(&board.statistics.load(kind).await),
    }
}

async fn run_board(action: BoardAction, board: &Taskboard) -> Result<bool> {
    let boards = &board.boards;
    match action {
        BoardAction::List => emit(&boards.load_boards().await),
        BoardAction::Show { id } => emit(&boards.load_board_view(&BoardId::from(id)).await),
        BoardAction::Create { title, description } => {
            let mut input = CreateBoardInput::new(title);
            if let Some(description) = description {
                input = input.with_description(description);
            }
            emit(&boards.create_board(&input).await)
        }
        BoardAction::Delete { id, confirm, last } => {
            let id = BoardId::from(id);
            // The confirmation checks need the full board list
            let loaded = boards.load_boards().await;
            if !loaded.success {
                return emit(&loaded);
            }
            let mut deletion = BoardDeletion::new(confirm);
            if last {
                deletion = deletion.confirm_last_board();
            }
            emit(&boards.delete_board(&id, &deletion).await)
        }
        BoardAction::Favorite { id } => emit(&boards.toggle_favorite(&BoardId::from(id)).await),
        BoardAction::Stats { id } => emit(&boards.load_board_statistics(&BoardId::from(id)).await),
    }
}

async fn run_column(action: ColumnAction, board: &Taskboard) -> Result<bool> {
    let board_id = BoardId::from(action.board_id());

    // Column guards run against the board's current columns
    let loaded = board.boards.load_board(&board_id).await;
    if !loaded.success {
        return emit(&loaded);
    }
    debug!(%board_id, "Board refreshed before column change");

    let columns = &board.columns;
    match action {
        ColumnAction::Add { title, .. } => {
            emit(&columns.add_column(&board_id, &CreateColumnInput::new(title)).await)
        }
        ColumnAction::Rename {
            column_id, title, ..
        } => emit(
            &columns
                .update_column(&board_id, &ColumnId::from(column_id), &ColumnPatch::rename(title))
                .await,
        ),
        ColumnAction::Delete { column_id, .. } => {
            emit(&columns.delete_column(&board_id, &ColumnId::from(column_id)).await)
        }
    }
}

async fn run_task(action: TaskAction, board: &Taskboard) -> Result<bool> {
    let tasks = &board.tasks;
    match action {
        TaskAction::List(args) => list_tasks(args, board).await,
        TaskAction::Add {
            board_id,
            column_id,
            title,
            priority,
        } => {
            let mut input = CreateTaskInput::new(title, board_id, column_id);
            if let Some(priority) = priority {
                input = input.with_priority(priority);
            }
            emit(&tasks.create_task(&input).await)
        }
        TaskAction::Move {
            task_id,
            from,
            to,
            status,
            order,
        } => {
            let mut input = MoveTaskInput::new(from, to, status);
            if let Some(order) = order {
                input = input.with_order(order);
            }
            emit(&tasks.move_task(&TaskId::from(task_id), &input).await)
        }
        TaskAction::Status { task_id, status } => {
            emit(&tasks.update_status(&TaskId::from(task_id), status).await)
        }
        TaskAction::Delete { task_id } => emit(&tasks.delete_task(&TaskId::from(task_id)).await),
        TaskAction::Comment { task_id, content } => emit(
            &tasks
                .tasks()
                .add_comment(&TaskId::from(task_id), &CommentInput::new(content))
                .await,
        ),
    }
}

async fn list_tasks(args: TaskListArgs, board: &Taskboard) -> Result<bool> {
    if let (Some(board_id), None, None) = (&args.board, &args.status, &args.search) {
        let board_id = BoardId::from(board_id.as_str());
        // Board tasks land in columns, so the board itself must be known
        let known = board.store().read().await.find_board(&board_id).is_some();
        if !known {
            let loaded = board.boards.load_board(&board_id).await;
            if !loaded.success {
                return emit(&loaded);
            }
        }
        return emit(&board.tasks.load_board_tasks(&board_id, args.reload).await);
    }

    let mut filter = TaskFilter::new();
    filter.board_id = args.board.map(BoardId::from);
    if let Some(status) = args.status {
        filter = filter.with_status(status);
    }
    if let Some(search) = args.search {
        filter = filter.with_search(search);
    }
    emit(&board.tasks.tasks().load_tasks(&filter).await)
}
