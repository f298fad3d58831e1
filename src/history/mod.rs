mod reconstructor;
#[cfg(test)]
mod tests;

pub use reconstructor::{reconstruct, HistorySnapshot};
