pub mod generate_cmd;
pub mod list_cmd;
