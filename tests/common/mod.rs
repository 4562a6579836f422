#![allow(dead_code)]

use std::sync::Once;

pub mod cli;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        redirect_maps::logging::init_test_logging();
    });
}
