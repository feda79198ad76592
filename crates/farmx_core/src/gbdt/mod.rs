//! Fixed-point tree ensembles
//!
//! Every predictor artifact is built from one or more ensembles of decision
//! trees. Features arrive already scaled and quantized to integers at
//! [`SCALE`], so inference is integer-only and gives the same answer on
//! every platform.
//!
//! ```rust
//! use farmx_core::gbdt::{Model, Node, Tree, SCALE};
//!
//! let tree = Tree::new(
//!     vec![
//!         Node::internal(0, 0, 0, 1, 2),
//!         Node::leaf(1, 10 * SCALE),
//!         Node::leaf(2, 20 * SCALE),
//!     ],
//!     SCALE,
//! );
//! let model = Model::new(vec![tree], 0);
//! assert_eq!(model.score(&[-SCALE]).unwrap(), 10 * SCALE);
//! ```

pub mod model;
pub mod tree;

pub use model::{Model, ModelError, SCALE};
pub use tree::{Node, Tree};
