pub mod progress_utils;
