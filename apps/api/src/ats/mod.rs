// Resume analysis: catalogue → normalizer → scorer → explanation.
// Only `handlers` knows about HTTP; everything else is pure and synchronous.

pub mod catalogue;
pub mod explanation;
pub mod handlers;
pub mod normalizer;
pub mod scorer;
