/// Histogram key
pub const NAME: &str = "name";
/// Lower axis edge
pub const LO: &str = "lo";
/// Upper axis edge
pub const HI: &str = "hi";
/// Number of bins
pub const N_BINS: &str = "n_bins";
/// Number of fills
pub const ENTRIES: &str = "entries";
/// Bin contents
pub const CONTENTS: &str = "contents";
