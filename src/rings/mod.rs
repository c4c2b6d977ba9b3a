pub mod arithmetic;
pub mod ntt;
pub mod poly;

pub use arithmetic::{
    add_poly_coeffmod, dyadic_product_assign, dyadic_product_coeffmod,
    negate_poly_coeffmod, set_zero_poly,
};
pub use ntt::{NttError, NttResult, NttTable};
pub use poly::{PolyForm, RnsPoly};
