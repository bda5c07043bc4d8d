pub mod special;
