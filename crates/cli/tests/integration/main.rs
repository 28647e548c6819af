mod common;
mod dag_tests;
mod resolve_tests;
