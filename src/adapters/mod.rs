//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements    | Connects to                 |
//! |----------------|---------------|-----------------------------|
//! | `hardware`     | ValvePort     | relay board via GPIO        |
//! | `log_sink`     | EventSink     | log output                  |
//! | `status_file`  | StatusStore   | JSON status file            |
//! | `time`         | Clock         | system wall clock           |

pub mod hardware;
pub mod log_sink;
pub mod status_file;
pub mod time;
