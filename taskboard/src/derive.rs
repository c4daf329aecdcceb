//! Values computed from store state rather than stored in it

use serde::Serialize;
use std::cmp::Ordering;
use taskboard_client::types::{
    Board, Column, ColumnId, SortDirection, SortField, StandardColumn, Task, TaskStatus,
};

/// Current time as epoch milliseconds, the unit of `Task::due_date`
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The status a task should be shown with at `now_ms`.
///
/// A task past its due date is `Overdue` unless it is completed or cancelled.
pub fn effective_status(task: &Task, now_ms: i64) -> TaskStatus {
    match task.due_date {
        Some(due) if due < now_ms && !task.status.is_closed() => TaskStatus::Overdue,
        _ => task.status,
    }
}

pub fn is_overdue(task: &Task, now_ms: i64) -> bool {
    effective_status(task, now_ms) == TaskStatus::Overdue
}

/// A column as it should be displayed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub column_id: ColumnId,
    pub title: String,
    pub is_standard: bool,
    pub standard_kind: Option<StandardColumn>,
    /// Tasks in display order, each carrying its effective status
    pub tasks: Vec<Task>,
}

fn compare_tasks(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::Order => a.order.cmp(&b.order),
        // Most urgent first when ascending
        SortField::Priority => b.priority.cmp(&a.priority),
        SortField::DueDate => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

fn sort_for_column(tasks: &mut [Task], column: &Column) {
    let settings = &column.settings;
    let field = if settings.auto_sort_tasks {
        settings.sort_by
    } else {
        SortField::Order
    };
    tasks.sort_by(|a, b| {
        let ordering = compare_tasks(a, b, field);
        match settings.sort_direction {
            SortDirection::Desc if settings.auto_sort_tasks => ordering.reverse(),
            _ => ordering,
        }
    });
}

/// Per-column task lists for display.
///
/// When the board has an overdue column, overdue tasks are listed there
/// instead of in the column that owns them. Without one they stay put.
pub fn column_views(board: &Board, now_ms: i64) -> Vec<ColumnView> {
    let has_overdue_column = board.overdue_column().is_some();
    let displayed = |task: &Task| {
        let mut task = task.clone();
        task.status = effective_status(&task, now_ms);
        task
    };

    board
        .columns
        .iter()
        .map(|column| {
            let mut tasks: Vec<Task> = if column.is_overdue_column() {
                column
                    .tasks
                    .iter()
                    .chain(
                        board
                            .columns
                            .iter()
                            .filter(|c| c.id != column.id)
                            .flat_map(|c| c.tasks.iter())
                            .filter(|t| is_overdue(t, now_ms)),
                    )
                    .map(displayed)
                    .collect()
            } else {
                column
                    .tasks
                    .iter()
                    .filter(|t| !(has_overdue_column && is_overdue(t, now_ms)))
                    .map(displayed)
                    .collect()
            };
            sort_for_column(&mut tasks, column);
            ColumnView {
                column_id: column.id.clone(),
                title: column.title.clone(),
                is_standard: column.is_standard,
                standard_kind: column.standard_kind,
                tasks,
            }
        })
        .collect()
}

/// Known default column titles, English and Russian
const STANDARD_TITLES: &[(StandardColumn, &[&str])] = &[
    (StandardColumn::Planning, &["planning", "to do", "todo", "планирование", "запланировано"]),
    (StandardColumn::InProgress, &["in progress", "в работе", "в процессе"]),
    (StandardColumn::Review, &["review", "on review", "на проверке", "проверка"]),
    (StandardColumn::Completed, &["completed", "done", "выполнено", "завершено", "готово"]),
    (StandardColumn::Overdue, &["overdue", "просрочено", "просроченные"]),
];

fn standard_kind_for_title(title: &str) -> Option<StandardColumn> {
    let normalized = title.trim().to_lowercase();
    STANDARD_TITLES
        .iter()
        .find(|(_, titles)| titles.contains(&normalized.as_str()))
        .map(|(kind, _)| *kind)
}

/// Mark columns created before `is_standard`/`standard_kind` existed.
///
/// Only used when rehydrating old snapshots. Each kind is assigned at most
/// once per board. Returns how many columns were changed.
pub fn migrate_standard_columns(board: &mut Board) -> usize {
    let mut taken: Vec<StandardColumn> = board
        .columns
        .iter()
        .filter_map(|c| c.standard_kind)
        .collect();
    let mut migrated = 0;

    for column in board.columns.iter_mut() {
        if column.standard_kind.is_some() {
            continue;
        }
        let Some(kind) = standard_kind_for_title(&column.title) else {
            continue;
        };
        if taken.contains(&kind) {
            continue;
        }
        column.is_standard = true;
        column.standard_kind = Some(kind);
        taken.push(kind);
        migrated += 1;
    }
    migrated
}
