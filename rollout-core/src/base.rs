//! Core functionalities.
mod env;
mod learner;
mod policy;
mod step;
pub use env::Env;
pub use learner::Learner;
pub use policy::Policy;
use std::fmt::Debug;
pub use step::Step;

/// An observation of an environment.
///
/// Observations cross thread boundaries when environments are stepped by
/// [`MultiEpisodeRunner`](crate::runner::MultiEpisodeRunner), hence `Send`.
pub trait Obs: Clone + Debug + Send + 'static {}

/// An action of an environment.
pub trait Act: Clone + Debug + Send + 'static {
    /// Returns the components of the action as floats.
    ///
    /// Used for recording histograms of actions taken in an episode.
    /// A discrete action returns its index as a single element.
    fn to_vec_f32(&self) -> Vec<f32>;
}
