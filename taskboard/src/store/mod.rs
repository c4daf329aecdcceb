//! Normalized client-side state and its transitions
//!
//! [`BoardStore`] is plain data plus pure transitions: no I/O, no clock, no
//! randomness. Each transition validates its inputs before touching anything,
//! so an `Err` leaves the store exactly as it was.
//!
//! Invariants kept by every transition:
//!
//! - every task id lives in exactly one column of exactly one board, and the
//!   task's `board_id`/`column_id` name that column
//! - the current board is always an entry of `boards` (it is tracked by id)

mod handle;
mod snapshot;

pub use handle::StoreHandle;
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};

use crate::derive::{self, ColumnView};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use taskboard_client::types::{
    Attachment, Board, BoardId, BoardPatch, BoardStatistics, Column, ColumnId, ColumnPatch,
    Comment, Task, TaskId, TaskStatus, UserProfile,
};

/// Where a task currently lives, as indexes into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TaskLocation {
    board: usize,
    column: usize,
    task: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardStore {
    boards: Vec<Board>,
    current_board: Option<BoardId>,
    user: Option<UserProfile>,
}

/// Make every column and task point back at its owner
fn adopt_children(board: &mut Board) {
    for column in board.columns.iter_mut() {
        column.board_id = board.id.clone();
        for task in column.tasks.iter_mut() {
            task.board_id = board.id.clone();
            task.column_id = column.id.clone();
        }
    }
}

fn renumber(column: &mut Column) {
    for (index, task) in column.tasks.iter_mut().enumerate() {
        task.order = index as u32;
    }
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from rehydrated data, dropping duplicate ids
    pub fn from_parts(boards: Vec<Board>, user: Option<UserProfile>) -> Self {
        let mut store = Self {
            boards: Vec::new(),
            current_board: None,
            user,
        };
        store.replace_all_boards(boards);
        store
    }

    // ----- queries -------------------------------------------------------

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn current_board(&self) -> Option<&Board> {
        self.current_board.as_ref().and_then(|id| self.find_board(id))
    }

    pub fn current_board_id(&self) -> Option<&BoardId> {
        self.current_board.as_ref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn find_board(&self, id: &BoardId) -> Option<&Board> {
        self.boards.iter().find(|b| &b.id == id)
    }

    fn board_index(&self, id: &BoardId) -> Result<usize, StoreError> {
        self.boards
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| StoreError::board_not_found(id))
    }

    fn column_index(&self, board: usize, id: &ColumnId) -> Result<usize, StoreError> {
        self.boards[board]
            .columns
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| StoreError::column_not_found(id))
    }

    /// Board and column index of a column anywhere in the store
    fn locate_column(&self, id: &ColumnId) -> Option<(usize, usize)> {
        self.boards.iter().enumerate().find_map(|(b, board)| {
            board
                .columns
                .iter()
                .position(|c| &c.id == id)
                .map(|c| (b, c))
        })
    }

    fn locate_task(&self, id: &TaskId) -> Option<TaskLocation> {
        for (b, board) in self.boards.iter().enumerate() {
            for (c, column) in board.columns.iter().enumerate() {
                if let Some(t) = column.tasks.iter().position(|t| &t.id == id) {
                    return Some(TaskLocation {
                        board: b,
                        column: c,
                        task: t,
                    });
                }
            }
        }
        None
    }

    fn task_location(&self, id: &TaskId) -> Result<TaskLocation, StoreError> {
        self.locate_task(id)
            .ok_or_else(|| StoreError::task_not_found(id))
    }

    pub fn find_column(&self, id: &ColumnId) -> Option<&Column> {
        self.locate_column(id)
            .map(|(b, c)| &self.boards[b].columns[c])
    }

    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.locate_task(id)
            .map(|loc| &self.boards[loc.board].columns[loc.column].tasks[loc.task])
    }

    /// The column currently holding a task
    pub fn column_of_task(&self, id: &TaskId) -> Option<&Column> {
        self.locate_task(id)
            .map(|loc| &self.boards[loc.board].columns[loc.column])
    }

    /// Every task of every board, in board then column order
    pub fn all_tasks(&self) -> Vec<&Task> {
        self.boards.iter().flat_map(|b| b.tasks()).collect()
    }

    /// Flat task list of one board; the inverse of [`update_board_tasks`](Self::update_board_tasks)
    pub fn board_tasks(&self, id: &BoardId) -> Result<Vec<Task>, StoreError> {
        let board = &self.boards[self.board_index(id)?];
        Ok(board.tasks().cloned().collect())
    }

    /// A board's columns as displayed at `now_ms`, overdue tasks re-derived
    pub fn column_views(&self, id: &BoardId, now_ms: i64) -> Result<Vec<ColumnView>, StoreError> {
        let board = &self.boards[self.board_index(id)?];
        Ok(derive::column_views(board, now_ms))
    }

    // ----- boards --------------------------------------------------------

    /// Replace the board collection. Later duplicates of a board, column or
    /// task id are dropped.
    pub fn replace_all_boards(&mut self, boards: Vec<Board>) {
        let mut accepted: Vec<Board> = Vec::with_capacity(boards.len());
        for mut board in boards {
            if accepted.iter().any(|b| b.id == board.id) {
                continue;
            }
            board.columns.retain(|column| {
                !accepted
                    .iter()
                    .any(|b| b.columns.iter().any(|c| c.id == column.id))
            });
            let mut seen_columns: Vec<ColumnId> = Vec::new();
            board.columns.retain(|c| {
                let fresh = !seen_columns.contains(&c.id);
                seen_columns.push(c.id.clone());
                fresh
            });
            let mut seen_tasks: Vec<TaskId> = accepted
                .iter()
                .flat_map(|b| b.tasks().map(|t| t.id.clone()))
                .collect();
            for column in board.columns.iter_mut() {
                column.tasks.retain(|t| {
                    let fresh = !seen_tasks.contains(&t.id);
                    seen_tasks.push(t.id.clone());
                    fresh
                });
            }
            adopt_children(&mut board);
            accepted.push(board);
        }
        self.boards = accepted;
        if self
            .current_board
            .as_ref()
            .is_some_and(|id| self.find_board(id).is_none())
        {
            self.current_board = None;
        }
    }

    pub fn add_board(&mut self, mut board: Board) -> Result<(), StoreError> {
        if self.find_board(&board.id).is_some() {
            return Err(StoreError::duplicate_id("board", &board.id));
        }
        if let Some(column) = board
            .columns
            .iter()
            .find(|c| self.locate_column(&c.id).is_some())
        {
            return Err(StoreError::duplicate_id("column", &column.id));
        }
        if let Some(task) = board.tasks().find(|t| self.locate_task(&t.id).is_some()) {
            return Err(StoreError::duplicate_id("task", &task.id));
        }
        adopt_children(&mut board);
        self.boards.push(board);
        Ok(())
    }

    /// Merge the patch into the board; columns and tasks are untouched
    pub fn update_board(&mut self, id: &BoardId, patch: &BoardPatch) -> Result<(), StoreError> {
        let index = self.board_index(id)?;
        patch.apply(&mut self.boards[index]);
        Ok(())
    }

    pub fn set_board_statistics(
        &mut self,
        id: &BoardId,
        statistics: BoardStatistics,
    ) -> Result<(), StoreError> {
        let index = self.board_index(id)?;
        self.boards[index].statistics = statistics;
        Ok(())
    }

    /// Remove a board; clears the current board if it was this one
    pub fn delete_board(&mut self, id: &BoardId) -> Result<Board, StoreError> {
        let index = self.board_index(id)?;
        if self.current_board.as_ref() == Some(id) {
            self.current_board = None;
        }
        Ok(self.boards.remove(index))
    }

    /// Flip the favorite flag, returning the new value
    pub fn toggle_favorite(&mut self, id: &BoardId) -> Result<bool, StoreError> {
        let index = self.board_index(id)?;
        let board = &mut self.boards[index];
        board.is_favorite = !board.is_favorite;
        Ok(board.is_favorite)
    }

    /// Make `board` current, inserting or replacing it in the collection.
    /// `None` clears the selection.
    pub fn set_current_board(&mut self, board: Option<Board>) -> Result<(), StoreError> {
        let Some(mut board) = board else {
            self.current_board = None;
            return Ok(());
        };

        let existing = self.board_index(&board.id).ok();
        // Columns and tasks may not collide with other boards
        let foreign_boards = |b: &usize| Some(*b) != existing;
        for column in &board.columns {
            if let Some((b, _)) = self.locate_column(&column.id) {
                if foreign_boards(&b) {
                    return Err(StoreError::duplicate_id("column", &column.id));
                }
            }
        }
        for task in board.tasks() {
            if let Some(loc) = self.locate_task(&task.id) {
                if foreign_boards(&loc.board) {
                    return Err(StoreError::duplicate_id("task", &task.id));
                }
            }
        }

        adopt_children(&mut board);
        self.current_board = Some(board.id.clone());
        match existing {
            Some(index) => self.boards[index] = board,
            None => self.boards.push(board),
        }
        Ok(())
    }

    /// Select an existing board by id
    pub fn select_board(&mut self, id: &BoardId) -> Result<(), StoreError> {
        self.board_index(id)?;
        self.current_board = Some(id.clone());
        Ok(())
    }

    /// Replace every task of a board with a flat list, placing each task in
    /// the column its `column_id` names.
    ///
    /// Tasks naming a column the board does not have are skipped and their
    /// ids returned. A task id that lived on another board moves here.
    pub fn update_board_tasks(
        &mut self,
        board_id: &BoardId,
        tasks: Vec<Task>,
    ) -> Result<Vec<TaskId>, StoreError> {
        let board_index = self.board_index(board_id)?;

        let mut skipped = Vec::new();
        let mut placed: Vec<Vec<Task>> = vec![Vec::new(); self.boards[board_index].columns.len()];
        for mut task in tasks {
            let Some(column) = self.boards[board_index]
                .columns
                .iter()
                .position(|c| c.id == task.column_id)
            else {
                skipped.push(task.id);
                continue;
            };
            // Last occurrence of a duplicate id wins
            for list in placed.iter_mut() {
                list.retain(|t| t.id != task.id);
            }
            task.board_id = board_id.clone();
            placed[column].push(task);
        }

        let incoming: Vec<TaskId> = placed.iter().flatten().map(|t| t.id.clone()).collect();
        for (b, board) in self.boards.iter_mut().enumerate() {
            if b == board_index {
                continue;
            }
            for column in board.columns.iter_mut() {
                column.tasks.retain(|t| !incoming.contains(&t.id));
            }
        }

        let board = &mut self.boards[board_index];
        for (column, mut tasks) in board.columns.iter_mut().zip(placed) {
            tasks.sort_by_key(|t| t.order);
            column.tasks = tasks;
        }
        Ok(skipped)
    }

    // ----- columns -------------------------------------------------------

    pub fn add_column(&mut self, board_id: &BoardId, mut column: Column) -> Result<(), StoreError> {
        let index = self.board_index(board_id)?;
        if self.locate_column(&column.id).is_some() {
            return Err(StoreError::duplicate_id("column", &column.id));
        }
        if let Some(task) = column.tasks.iter().find(|t| self.locate_task(&t.id).is_some()) {
            return Err(StoreError::duplicate_id("task", &task.id));
        }
        column.board_id = board_id.clone();
        for task in column.tasks.iter_mut() {
            task.board_id = board_id.clone();
            task.column_id = column.id.clone();
        }
        self.boards[index].columns.push(column);
        Ok(())
    }

    /// Merge the patch into the column; its tasks are untouched
    pub fn update_column(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        patch: &ColumnPatch,
    ) -> Result<(), StoreError> {
        let board = self.board_index(board_id)?;
        let column = self.column_index(board, column_id)?;
        patch.apply(&mut self.boards[board].columns[column]);
        Ok(())
    }

    /// Remove a column together with any tasks it still holds
    pub fn delete_column(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
    ) -> Result<Column, StoreError> {
        let board = self.board_index(board_id)?;
        let column = self.column_index(board, column_id)?;
        Ok(self.boards[board].columns.remove(column))
    }

    // ----- tasks ---------------------------------------------------------

    /// Append a task to a column. If the id already lives elsewhere it is
    /// moved here.
    pub fn add_task_to_column(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        mut task: Task,
    ) -> Result<(), StoreError> {
        let board = self.board_index(board_id)?;
        let column = self.column_index(board, column_id)?;

        if let Some(loc) = self.locate_task(&task.id) {
            let old = &mut self.boards[loc.board].columns[loc.column];
            old.tasks.remove(loc.task);
            renumber(old);
        }

        let target = &mut self.boards[board].columns[column];
        task.board_id = board_id.clone();
        task.column_id = column_id.clone();
        task.order = target.tasks.len() as u32;
        target.tasks.push(task);
        Ok(())
    }

    /// Replace a stored task with a newer version of itself.
    ///
    /// If `column_id` changed the task is appended to the new column.
    pub fn update_task(&mut self, mut task: Task) -> Result<(), StoreError> {
        let loc = self.task_location(&task.id)?;
        let current_column = &self.boards[loc.board].columns[loc.column];

        if current_column.id == task.column_id {
            task.board_id = current_column.board_id.clone();
            self.boards[loc.board].columns[loc.column].tasks[loc.task] = task;
            return Ok(());
        }

        let (board, column) = self
            .locate_column(&task.column_id)
            .ok_or_else(|| StoreError::column_not_found(&task.column_id))?;

        let old = &mut self.boards[loc.board].columns[loc.column];
        old.tasks.remove(loc.task);
        renumber(old);

        let target = &mut self.boards[board].columns[column];
        task.board_id = target.board_id.clone();
        task.order = target.tasks.len() as u32;
        target.tasks.push(task);
        Ok(())
    }

    /// Replace the task if the store has it, otherwise add it to its column
    pub fn upsert_task(&mut self, task: Task) -> Result<(), StoreError> {
        if self.locate_task(&task.id).is_some() {
            return self.update_task(task);
        }
        let (board, _) = self
            .locate_column(&task.column_id)
            .ok_or_else(|| StoreError::column_not_found(&task.column_id))?;
        let board_id = self.boards[board].id.clone();
        let column_id = task.column_id.clone();
        self.add_task_to_column(&board_id, &column_id, task)
    }

    /// Apply an in-place change to a stored task; its column is unchanged
    pub fn modify_task<F>(&mut self, id: &TaskId, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Task),
    {
        let loc = self.task_location(id)?;
        let task = &mut self.boards[loc.board].columns[loc.column].tasks[loc.task];
        let (board_id, column_id, task_id) =
            (task.board_id.clone(), task.column_id.clone(), task.id.clone());
        change(&mut *task);
        task.board_id = board_id;
        task.column_id = column_id;
        task.id = task_id;
        Ok(())
    }

    pub fn delete_task(&mut self, id: &TaskId) -> Result<Task, StoreError> {
        let loc = self.task_location(id)?;
        let column = &mut self.boards[loc.board].columns[loc.column];
        let task = column.tasks.remove(loc.task);
        renumber(column);
        Ok(task)
    }

    /// Move a task between columns of the same board.
    ///
    /// The task is inserted at `new_order` (clamped to the column length) or
    /// appended, takes `new_status`, and both columns are renumbered `0..n`.
    pub fn move_task(
        &mut self,
        task_id: &TaskId,
        from: &ColumnId,
        to: &ColumnId,
        new_status: TaskStatus,
        new_order: Option<u32>,
    ) -> Result<(), StoreError> {
        let loc = self.task_location(task_id)?;
        let board = loc.board;
        if &self.boards[board].columns[loc.column].id != from {
            self.column_index(board, from)?;
            return Err(StoreError::TaskNotInColumn {
                task: task_id.to_string(),
                column: from.to_string(),
            });
        }
        let target = self.column_index(board, to)?;

        let source = &mut self.boards[board].columns[loc.column];
        let mut task = source.tasks.remove(loc.task);
        renumber(source);

        task.status = new_status;
        task.column_id = to.clone();

        let destination = &mut self.boards[board].columns[target];
        let position = new_order
            .map(|order| (order as usize).min(destination.tasks.len()))
            .unwrap_or(destination.tasks.len());
        destination.tasks.insert(position, task);
        renumber(destination);
        Ok(())
    }

    /// Move a task into the standard column matching `new_status`.
    pub fn move_task_by_status(
        &mut self,
        task_id: &TaskId,
        new_status: TaskStatus,
    ) -> Result<(), StoreError> {
        let loc = self.task_location(task_id)?;
        let board = &self.boards[loc.board];
        let from = board.columns[loc.column].id.clone();
        let to = new_status
            .standard_column()
            .and_then(|kind| board.standard_column(kind))
            .map(|c| c.id.clone())
            .ok_or_else(|| StoreError::NoColumnForStatus {
                board: board.id.to_string(),
                status: new_status,
            })?;

        if from == to {
            self.boards[loc.board].columns[loc.column].tasks[loc.task].status = new_status;
            return Ok(());
        }
        self.move_task(task_id, &from, &to, new_status, None)
    }

    pub fn add_comment(&mut self, task_id: &TaskId, comment: Comment) -> Result<(), StoreError> {
        self.modify_task(task_id, |task| {
            task.statistics.comments_count += 1;
            task.comments.push(comment);
        })
    }

    pub fn add_attachment(
        &mut self,
        task_id: &TaskId,
        attachment: Attachment,
    ) -> Result<(), StoreError> {
        self.modify_task(task_id, |task| {
            task.statistics.attachments_count += 1;
            task.attachments.push(attachment);
        })
    }

    // ----- user ----------------------------------------------------------

    pub fn set_user(&mut self, user: UserProfile) {
        self.user = Some(user);
    }

    pub fn clear_user(&mut self) {
        self.user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_client::types::StandardColumn;

    fn board(id: &str, prefix: &str) -> Board {
        Board::new(id, format!("Board {id}")).with_columns(vec![
            Column::standard(format!("{prefix}-plan"), id, StandardColumn::Planning, 0),
            Column::standard(format!("{prefix}-prog"), id, StandardColumn::InProgress, 1),
            Column::standard(format!("{prefix}-rev"), id, StandardColumn::Review, 2),
            Column::standard(format!("{prefix}-done"), id, StandardColumn::Completed, 3),
            Column::new(format!("{prefix}-ideas"), id, "Ideas", 4),
        ])
    }

    fn store() -> BoardStore {
        let mut store = BoardStore::new();
        store.replace_all_boards(vec![board("b1", "x"), board("b2", "y")]);
        store
    }

    fn bid(s: &str) -> BoardId {
        BoardId::from(s)
    }

    fn cid(s: &str) -> ColumnId {
        ColumnId::from(s)
    }

    fn tid(s: &str) -> TaskId {
        TaskId::from(s)
    }

    /// Every task id appears once, and its ids name the owning column
    fn assert_ownership(store: &BoardStore) {
        let mut seen = Vec::new();
        for board in store.boards() {
            for column in &board.columns {
                assert_eq!(column.board_id, board.id);
                for task in &column.tasks {
                    assert!(!seen.contains(&task.id), "duplicate task {}", task.id);
                    seen.push(task.id.clone());
                    assert_eq!(task.board_id, board.id);
                    assert_eq!(task.column_id, column.id);
                }
            }
        }
    }

    fn column_task_ids(store: &BoardStore, column: &str) -> Vec<String> {
        store
            .find_column(&cid(column))
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.id.to_string())
            .collect()
    }

    #[test]
    fn test_add_task_and_lookup() {
        let mut store = store();
        store
            .add_task_to_column(&bid("b1"), &cid("x-plan"), Task::new("t1", "??", "??", "First"))
            .unwrap();

        let task = store.find_task(&tid("t1")).unwrap();
        assert_eq!(task.board_id, "b1");
        assert_eq!(task.column_id, "x-plan");
        assert_eq!(store.column_of_task(&tid("t1")).unwrap().id, "x-plan");
        assert_eq!(store.all_tasks().len(), 1);
        assert_ownership(&store);
    }

    #[test]
    fn test_unknown_ids_leave_store_unchanged() {
        let mut store = store();
        let before = store.clone();

        assert_eq!(
            store.add_task_to_column(&bid("nope"), &cid("x-plan"), Task::new("t", "b", "c", "T")),
            Err(StoreError::board_not_found("nope"))
        );
        assert_eq!(
            store.add_task_to_column(&bid("b1"), &cid("y-plan"), Task::new("t", "b", "c", "T")),
            Err(StoreError::column_not_found("y-plan"))
        );
        assert!(store.delete_task(&tid("ghost")).is_err());
        assert!(store
            .move_task(&tid("ghost"), &cid("x-plan"), &cid("x-prog"), TaskStatus::InProgress, None)
            .is_err());
        assert!(store.update_board(&bid("nope"), &BoardPatch::new().with_title("X")).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_move_task_renumbers_both_columns() {
        let mut store = store();
        for (id, column) in [("a", "x-plan"), ("b", "x-plan"), ("c", "x-plan"), ("d", "x-prog")] {
            store
                .add_task_to_column(&bid("b1"), &cid(column), Task::new(id, "b1", column, id))
                .unwrap();
        }

        store
            .move_task(&tid("b"), &cid("x-plan"), &cid("x-prog"), TaskStatus::InProgress, Some(0))
            .unwrap();

        assert_eq!(column_task_ids(&store, "x-plan"), vec!["a", "c"]);
        assert_eq!(column_task_ids(&store, "x-prog"), vec!["b", "d"]);
        let moved = store.find_task(&tid("b")).unwrap();
        assert_eq!(moved.status, TaskStatus::InProgress);
        assert_eq!(moved.column_id, "x-prog");
        let orders: Vec<u32> = store
            .find_column(&cid("x-plan"))
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.order)
            .collect();
        assert_eq!(orders, vec![0, 1]);
        assert_eq!(store.find_task(&tid("d")).unwrap().order, 1);
        assert_ownership(&store);
    }

    #[test]
    fn test_move_task_clamps_order_and_appends() {
        let mut store = store();
        store
            .add_task_to_column(&bid("b1"), &cid("x-plan"), Task::new("a", "b1", "x-plan", "A"))
            .unwrap();
        store
            .add_task_to_column(&bid("b1"), &cid("x-prog"), Task::new("b", "b1", "x-prog", "B"))
            .unwrap();

        store
            .move_task(&tid("a"), &cid("x-plan"), &cid("x-prog"), TaskStatus::InProgress, Some(99))
            .unwrap();
        assert_eq!(column_task_ids(&store, "x-prog"), vec!["b", "a"]);
        assert_eq!(store.find_task(&tid("a")).unwrap().order, 1);
    }

    #[test]
    fn test_move_task_wrong_source_column() {
        let mut store = store();
        store
            .add_task_to_column(&bid("b1"), &cid("x-plan"), Task::new("a", "b1", "x-plan", "A"))
            .unwrap();
        let before = store.clone();
        assert!(matches!(
            store.move_task(&tid("a"), &cid("x-rev"), &cid("x-prog"), TaskStatus::InProgress, None),
            Err(StoreError::TaskNotInColumn { .. })
        ));
        // Destination on another board is unknown to this board
        assert!(matches!(
            store.move_task(&tid("a"), &cid("x-plan"), &cid("y-prog"), TaskStatus::InProgress, None),
            Err(StoreError::ColumnNotFound { .. })
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn test_move_task_by_status() {
        let mut store = store();
        store
            .add_task_to_column(&bid("b1"), &cid("x-plan"), Task::new("a", "b1", "x-plan", "A"))
            .unwrap();

        store.move_task_by_status(&tid("a"), TaskStatus::Testing).unwrap();
        assert_eq!(store.column_of_task(&tid("a")).unwrap().id, "x-rev");
        assert_eq!(store.find_task(&tid("a")).unwrap().status, TaskStatus::Testing);

        store.move_task_by_status(&tid("a"), TaskStatus::Review).unwrap();
        assert_eq!(store.column_of_task(&tid("a")).unwrap().id, "x-rev");

        assert!(matches!(
            store.move_task_by_status(&tid("a"), TaskStatus::Blocked),
            Err(StoreError::NoColumnForStatus { .. })
        ));
        // b1 has no overdue column
        assert!(matches!(
            store.move_task_by_status(&tid("a"), TaskStatus::Overdue),
            Err(StoreError::NoColumnForStatus { .. })
        ));
        assert_ownership(&store);
    }

    #[test]
    fn test_update_task_relocates_on_column_change() {
        let mut store = store();
        store
            .add_task_to_column(&bid("b1"), &cid("x-plan"), Task::new("a", "b1", "x-plan", "A"))
            .unwrap();

        let mut edited = store.find_task(&tid("a")).unwrap().clone();
        edited.title = "Renamed".into();
        store.update_task(edited.clone()).unwrap();
        assert_eq!(store.find_task(&tid("a")).unwrap().title, "Renamed");
        assert_eq!(store.column_of_task(&tid("a")).unwrap().id, "x-plan");

        edited.column_id = cid("x-done");
        store.update_task(edited.clone()).unwrap();
        assert_eq!(column_task_ids(&store, "x-done"), vec!["a"]);
        assert!(column_task_ids(&store, "x-plan").is_empty());

        edited.column_id = cid("missing");
        assert!(store.update_task(edited).is_err());
        assert_eq!(store.column_of_task(&tid("a")).unwrap().id, "x-done");
        assert_ownership(&store);
    }

    #[test]
    fn test_update_board_tasks_round_trip() {
        let mut store = store();
        for (id, column) in [("a", "x-plan"), ("b", "x-prog"), ("c", "x-plan"), ("d", "x-ideas")] {
            store
                .add_task_to_column(&bid("b1"), &cid(column), Task::new(id, "b1", column, id))
                .unwrap();
        }
        let before = store.clone();

        let flat = store.board_tasks(&bid("b1")).unwrap();
        let skipped = store.update_board_tasks(&bid("b1"), flat).unwrap();

        assert!(skipped.is_empty());
        assert_eq!(store, before);
    }

    #[test]
    fn test_update_board_tasks_partitions_and_skips_unknown_columns() {
        let mut store = store();
        store
            .add_task_to_column(&bid("b1"), &cid("x-plan"), Task::new("old", "b1", "x-plan", "Old"))
            .unwrap();
        store
            .add_task_to_column(&bid("b2"), &cid("y-plan"), Task::new("moved", "b2", "y-plan", "M"))
            .unwrap();

        let incoming = vec![
            Task::new("t2", "b1", "x-prog", "Two").with_order(1),
            Task::new("t1", "b1", "x-prog", "One").with_order(0),
            Task::new("moved", "b1", "x-done", "Moved"),
            Task::new("stray", "b1", "nowhere", "Stray"),
        ];
        let skipped = store.update_board_tasks(&bid("b1"), incoming).unwrap();

        assert_eq!(skipped, vec![tid("stray")]);
        assert!(store.find_task(&tid("old")).is_none());
        assert_eq!(column_task_ids(&store, "x-prog"), vec!["t1", "t2"]);
        assert_eq!(column_task_ids(&store, "x-done"), vec!["moved"]);
        assert!(column_task_ids(&store, "y-plan").is_empty());
        assert_ownership(&store);
    }

    #[test]
    fn test_current_board_mirrors_collection() {
        let mut store = store();
        store.select_board(&bid("b1")).unwrap();
        store
            .update_board(&bid("b1"), &BoardPatch::new().with_title("Renamed"))
            .unwrap();
        assert_eq!(store.current_board().unwrap().title, "Renamed");

        let mut fetched = store.find_board(&bid("b1")).unwrap().clone();
        fetched.description = "from server".into();
        store.set_current_board(Some(fetched)).unwrap();
        assert_eq!(store.boards().len(), 2);
        assert_eq!(
            store.find_board(&bid("b1")).unwrap().description,
            "from server"
        );

        store.delete_board(&bid("b1")).unwrap();
        assert!(store.current_board().is_none());
        assert!(store.current_board_id().is_none());
    }

    #[test]
    fn test_set_current_board_inserts_new_board() {
        let mut store = store();
        store.set_current_board(Some(board("b3", "z"))).unwrap();
        assert_eq!(store.boards().len(), 3);
        assert_eq!(store.current_board().unwrap().id, "b3");

        // A board reusing another board's column ids is refused
        assert!(store.set_current_board(Some(board("b4", "x"))).is_err());
        assert_eq!(store.current_board().unwrap().id, "b3");

        store.set_current_board(None).unwrap();
        assert!(store.current_board().is_none());
    }

    #[test]
    fn test_replace_all_boards_drops_stale_selection() {
        let mut store = store();
        store.select_board(&bid("b2")).unwrap();
        store.replace_all_boards(vec![board("b1", "x")]);
        assert!(store.current_board().is_none());
    }

    #[test]
    fn test_replace_all_boards_drops_duplicates() {
        let mut store = BoardStore::new();
        let mut first = board("b1", "x");
        first.columns[0].tasks.push(Task::new("t1", "b1", "x-plan", "T"));
        let mut second = board("b2", "y");
        second.columns[0].tasks.push(Task::new("t1", "b2", "y-plan", "Dup"));
        store.replace_all_boards(vec![first, second, board("b1", "z")]);

        assert_eq!(store.boards().len(), 2);
        assert_eq!(store.all_tasks().len(), 1);
        assert_ownership(&store);
    }

    #[test]
    fn test_board_crud() {
        let mut store = store();
        assert!(store.add_board(board("b1", "q")).is_err());
        store.add_board(board("b3", "z")).unwrap();
        assert!(store.toggle_favorite(&bid("b3")).unwrap());
        assert!(!store.toggle_favorite(&bid("b3")).unwrap());

        let removed = store.delete_board(&bid("b3")).unwrap();
        assert_eq!(removed.id, "b3");
        assert!(store.find_board(&bid("b3")).is_none());
    }

    #[test]
    fn test_column_crud() {
        let mut store = store();
        store
            .add_column(&bid("b1"), Column::new("x-new", "other", "New", 5))
            .unwrap();
        assert_eq!(store.find_column(&cid("x-new")).unwrap().board_id, "b1");
        assert!(store
            .add_column(&bid("b2"), Column::new("x-new", "b2", "Dup", 5))
            .is_err());

        store
            .update_column(&bid("b1"), &cid("x-new"), &ColumnPatch::rename("Renamed"))
            .unwrap();
        assert_eq!(store.find_column(&cid("x-new")).unwrap().title, "Renamed");

        store.delete_column(&bid("b1"), &cid("x-new")).unwrap();
        assert!(store.find_column(&cid("x-new")).is_none());
        assert!(store.delete_column(&bid("b2"), &cid("x-plan")).is_err());
    }

    #[test]
    fn test_comments_attachments_and_user() {
        let mut store = store();
        store
            .add_task_to_column(&bid("b1"), &cid("x-plan"), Task::new("a", "b1", "x-plan", "A"))
            .unwrap();

        let comment: Comment = serde_json::from_value(serde_json::json!({
            "id": "cm1", "taskId": "a", "authorId": "u1", "content": "hi"
        }))
        .unwrap();
        store.add_comment(&tid("a"), comment).unwrap();
        let task = store.find_task(&tid("a")).unwrap();
        assert_eq!(task.comments.len(), 1);
        assert_eq!(task.statistics.comments_count, 1);

        store.set_user(UserProfile::new("u1", "ada"));
        assert_eq!(store.user().unwrap().username, "ada");
        store.clear_user();
        assert!(store.user().is_none());
    }

    #[test]
    fn test_delete_task_renumbers() {
        let mut store = store();
        for id in ["a", "b", "c"] {
            store
                .add_task_to_column(&bid("b1"), &cid("x-plan"), Task::new(id, "b1", "x-plan", id))
                .unwrap();
        }
        store.delete_task(&tid("a")).unwrap();
        let orders: Vec<u32> = store
            .find_column(&cid("x-plan"))
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.order)
            .collect();
        assert_eq!(orders, vec![0, 1]);
    }
}
