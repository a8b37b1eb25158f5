use std::fmt;

/// Every component the registry knows how to build.
///
/// The kind is the registry key (at most one live instance per kind) and
/// carries the host command name and call signature of its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Initialise,
    UpdateState,
    GetState,
    JointLimits,
    MassMatrix,
    GeneralisedForces,
    Jacobian,
    ForwardKinematics,
}

impl ComponentKind {
    /// All kinds, in command-table order.
    pub const ALL: [ComponentKind; 8] = [
        ComponentKind::Initialise,
        ComponentKind::UpdateState,
        ComponentKind::GetState,
        ComponentKind::JointLimits,
        ComponentKind::MassMatrix,
        ComponentKind::GeneralisedForces,
        ComponentKind::Jacobian,
        ComponentKind::ForwardKinematics,
    ];

    /// The command name the host uses to reach this component.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            ComponentKind::Initialise => "model-initialise",
            ComponentKind::UpdateState => "update-state",
            ComponentKind::GetState => "get-state",
            ComponentKind::JointLimits => "joint-limits",
            ComponentKind::MassMatrix => "mass-matrix",
            ComponentKind::GeneralisedForces => "generalised-forces",
            ComponentKind::Jacobian => "jacobian",
            ComponentKind::ForwardKinematics => "forward-kinematics",
        }
    }

    /// Looks up a kind by its command name.
    #[must_use]
    pub fn from_command(command: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.command() == command)
    }

    /// Accepted input counts and the maximum output count.
    #[must_use]
    pub const fn signature(self) -> Signature {
        match self {
            ComponentKind::Initialise => Signature::new(1, 1, 0),
            ComponentKind::UpdateState => Signature::new(3, 4, 0),
            ComponentKind::GetState => Signature::new(0, 0, 4),
            ComponentKind::JointLimits => Signature::new(0, 0, 2),
            ComponentKind::MassMatrix => Signature::new(0, 1, 1),
            ComponentKind::GeneralisedForces => Signature::new(0, 0, 1),
            ComponentKind::Jacobian | ComponentKind::ForwardKinematics => Signature::new(1, 1, 1),
        }
    }

    /// Returns `true` if computing this component changes the shared model.
    #[must_use]
    pub const fn mutates_model(self) -> bool {
        matches!(self, ComponentKind::Initialise | ComponentKind::UpdateState)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// How many inputs a component accepts and how many outputs it can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub min_inputs: usize,
    pub max_inputs: usize,
    pub max_outputs: usize,
}

impl Signature {
    #[must_use]
    pub const fn new(min_inputs: usize, max_inputs: usize, max_outputs: usize) -> Self {
        Self {
            min_inputs,
            max_inputs,
            max_outputs,
        }
    }

    /// Returns `true` if `nargin` inputs are accepted.
    #[must_use]
    pub const fn accepts_inputs(&self, nargin: usize) -> bool {
        nargin >= self.min_inputs && nargin <= self.max_inputs
    }
}
