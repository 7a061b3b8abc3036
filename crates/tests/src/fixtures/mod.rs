pub mod seed;
pub mod test_app;
