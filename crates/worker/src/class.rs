/// Who is waiting on a dispatched body. Recorded on every worker span and
/// dispatch event so slow user work can be told apart from cascade fallout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Started by the user; the selection stays locked until it completes.
	Interactive,
	/// Started by a cascade trigger.
	Background,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
		}
	}
}
