// Integration tests module

mod integration {
    mod config_test;
    mod history_test;
    mod monitor_test;
    mod platform_test;
}
