//! Status codes and action names shared by the host and its plugins.

/// Outcome code returned by every plugin action and host call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The call succeeded.
    Ok,
    /// The call failed.
    Failed,
    /// A fatal, unrecoverable error occurred.
    ErrFatal,
    /// An unknown or unspecified error occurred.
    ErrUnknown,
    /// The plugin needs a host feature that is not available.
    ErrMissingHostFeature,
    /// The requested operation is not supported.
    ErrUnsupported,
    /// Something with the same name already exists.
    ErrExists,
    /// An allocation failed.
    ErrMemory,
    /// A handle was missing or of the wrong kind.
    ErrBadHandle,
    /// A slot or component index was out of range.
    ErrBadIndex,
    /// A value was of the wrong kind or out of range.
    ErrValue,
    /// The plugin did not handle the action; the host applies its default.
    ReplyDefault,
}

impl Status {
    /// Raw integer value as defined by the plugin API.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Failed => 1,
            Self::ErrFatal => 2,
            Self::ErrUnknown => 3,
            Self::ErrMissingHostFeature => 4,
            Self::ErrUnsupported => 5,
            Self::ErrExists => 6,
            Self::ErrMemory => 8,
            Self::ErrBadHandle => 9,
            Self::ErrBadIndex => 10,
            Self::ErrValue => 11,
            Self::ReplyDefault => 14,
        }
    }

    /// Convert a raw integer status. Unrecognized codes map to `ErrUnknown`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Ok,
            1 => Self::Failed,
            2 => Self::ErrFatal,
            4 => Self::ErrMissingHostFeature,
            5 => Self::ErrUnsupported,
            6 => Self::ErrExists,
            8 => Self::ErrMemory,
            9 => Self::ErrBadHandle,
            10 => Self::ErrBadIndex,
            11 => Self::ErrValue,
            14 => Self::ReplyDefault,
            _ => Self::ErrUnknown,
        }
    }

    /// Returns true for `Ok` and `ReplyDefault`.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::ReplyDefault)
    }

    /// Returns true for every error code.
    pub fn is_error(self) -> bool {
        !self.is_success()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ok => "kOfxStatOK",
            Self::Failed => "kOfxStatFailed",
            Self::ErrFatal => "kOfxStatErrFatal",
            Self::ErrUnknown => "kOfxStatErrUnknown",
            Self::ErrMissingHostFeature => "kOfxStatErrMissingHostFeature",
            Self::ErrUnsupported => "kOfxStatErrUnsupported",
            Self::ErrExists => "kOfxStatErrExists",
            Self::ErrMemory => "kOfxStatErrMemory",
            Self::ErrBadHandle => "kOfxStatErrBadHandle",
            Self::ErrBadIndex => "kOfxStatErrBadIndex",
            Self::ErrValue => "kOfxStatErrValue",
            Self::ReplyDefault => "kOfxStatReplyDefault",
        };
        write!(f, "{}", name)
    }
}

/// Lifecycle action dispatched into a plugin's main entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// First action after the host is bound.
    Load,
    /// Last action before the host is unbound.
    Unload,
    /// Fill an effect descriptor with parameters and inputs.
    Describe,
    /// Set up a freshly copied instance.
    CreateInstance,
    /// Tear down an instance.
    DestroyInstance,
    /// Run the mesh transformation on an instance.
    Cook,
}

impl Action {
    /// All actions, in lifecycle order.
    pub const ALL: [Action; 6] = [
        Self::Load,
        Self::Describe,
        Self::CreateInstance,
        Self::Cook,
        Self::DestroyInstance,
        Self::Unload,
    ];

    /// Action name as seen by plugins.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "OfxActionLoad",
            Self::Unload => "OfxActionUnload",
            Self::Describe => "OfxActionDescribe",
            Self::CreateInstance => "OfxActionCreateInstance",
            Self::DestroyInstance => "OfxActionDestroyInstance",
            Self::Cook => "OfxMeshEffectActionCook",
        }
    }

    /// Look up an action by its name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == name)
    }

    /// Statuses that make the host abort after this action.
    ///
    /// Actions with an empty list are teardown actions: their result is
    /// logged and the host carries on.
    pub fn failure_statuses(&self) -> &'static [Status] {
        match self {
            Self::Load => &[Status::Failed, Status::ErrFatal, Status::ErrBadHandle],
            Self::Describe | Self::CreateInstance => &[
                Status::ErrMissingHostFeature,
                Status::ErrMemory,
                Status::Failed,
                Status::ErrFatal,
                Status::ErrBadHandle,
            ],
            Self::Cook => &[
                Status::ErrMemory,
                Status::Failed,
                Status::ErrFatal,
                Status::ErrBadHandle,
            ],
            Self::DestroyInstance | Self::Unload => &[],
        }
    }

    /// Returns true if `status` aborts the chain after this action.
    pub fn is_failure(&self, status: Status) -> bool {
        self.failure_statuses().contains(&status)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
