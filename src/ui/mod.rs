/// Picker grid widgets
///
/// - `cell` - the recyclable grid cell
/// - `layout` - fixed placement of the cell's sub-views
/// - `pool` - the page of cells the grid recycles
/// - `scrim` - the gradient behind the duration label

pub mod cell;
pub mod layout;
pub mod pool;
pub mod scrim;

pub use cell::GridCell;
pub use pool::CellPool;
