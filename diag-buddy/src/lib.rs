/// Builds & runs diagnostic commands, hands their output to [parse].
pub mod diag_call;
pub mod parse;

#[cfg(test)]
mod test_utils;
