pub mod basic_functions;
pub mod prompt;
#[cfg(test)]
pub(crate) mod test_server;
