pub mod tree_diff;
