mod sweeper;

pub use sweeper::run_sweeper;
