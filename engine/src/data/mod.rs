// Storage layer: folder scans, table files and the reconciler.

pub mod reconcile;
pub mod scan;
pub mod table_io;
pub mod tree;
