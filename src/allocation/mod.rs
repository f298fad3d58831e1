mod allocator;

pub use allocator::{Allocation, GoalAllocator, GoalProgress};
