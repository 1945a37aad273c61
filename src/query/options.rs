/// Per-subscription query behavior.
///
/// # Example
///
/// ```
/// use dashcam::query::QueryOptions;
///
/// let source: Option<String> = None;
/// let options = QueryOptions::default()
///     .skip(source.is_none())
///     .refetch_on_arg_change(true);
///
/// assert!(options.skip);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// When set, no fetch is issued and the handle stays idle.
    pub skip: bool,

    /// When set, attaching to a settled entry because the argument changed
    /// (or on first subscription) dispatches a fresh request while the
    /// previous data stays visible.
    pub refetch_on_arg_change: bool,
}

impl QueryOptions {
    #[must_use]
    pub const fn skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    #[must_use]
    pub const fn refetch_on_arg_change(mut self, refetch: bool) -> Self {
        self.refetch_on_arg_change = refetch;
        self
    }
}
