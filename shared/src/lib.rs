pub mod camera;
pub mod campaign;
pub mod countup;
pub mod easing;
pub mod events;
pub mod format;
pub mod geo;
pub mod geometry;
pub mod projection;
pub mod regions;
pub mod sequencer;
pub mod showcase;
pub mod timers;

pub use camera::{CameraCommand, CameraError, CameraInterpolator, MotionProfile, ViewTransform};
pub use campaign::{Campaign, CampaignDraft, CampaignError, active_campaigns};
pub use events::*;
pub use format::format_impact;
pub use geo::{CameraPosition, Coordinates, NEUTRAL_POSITION};
pub use projection::{MapFrame, Mercator};
pub use sequencer::{CycleTiming, Phase, PhaseSnapshot, SequencerEvent};
pub use showcase::{FrameSample, Showcase, TickOutput};
