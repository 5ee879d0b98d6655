mod support;

mod history_manager_tests;
