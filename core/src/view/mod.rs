pub mod selector;
pub mod shading;
pub mod shaping;

pub use selector::{Tab, View, ViewState};
pub use shading::{shade_for_margin, Rgb};
pub use shaping::{
    coalition_groups, party_stacks, turnout_bars, turnout_ranking, turnout_slices, Bar, BarGroup,
    PieSlice,
};
