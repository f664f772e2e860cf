pub mod csmatrix;
pub mod die_toggle;
pub mod meters;
pub mod press;
pub mod storage_sync;
pub mod touch_blocker;
