mod dag_for_ci;
mod graph;
mod inspect;
mod logs;
mod order;
mod read;
mod resolve;

pub use dag_for_ci::cmd_dag_for_ci;
pub use graph::cmd_graph;
pub use inspect::cmd_inspect;
pub use logs::cmd_logs;
pub use order::cmd_order;
pub use read::cmd_read;
pub use resolve::cmd_resolve;
