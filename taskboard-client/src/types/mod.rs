//! Wire types exchanged with the Taskboard backend

mod board;
mod column;
mod ids;
mod input;
mod task;
mod user;

pub use board::{Board, BoardMember, BoardSettings, BoardStatistics, BoardView, MemberRole};
pub use column::{
    Column, ColumnSettings, ColumnStatistics, SortDirection, SortField, StandardColumn,
};
pub use ids::{BoardId, ColumnId, CommentId, TaskId, UserId};
pub use input::{
    AttachmentUpload, BoardPatch, ColumnPatch, CommentInput, CreateBoardInput,
    CreateColumnInput, CreateTaskInput, MoveTaskInput, TaskFilter, TaskPatch,
};
pub use task::{
    Activity, Attachment, Comment, Reaction, Subtask, Tag, Task, TaskPriority, TaskStatistics,
    TaskStatus, TaskType,
};
pub use user::{Subscription, SubscriptionPlan, UserProfile};
