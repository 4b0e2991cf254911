#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator interrupt (Ctrl-C or SIGTERM) observed by the supervisor.
    InterruptReceived,
    /// Both cleanup sweeps completed; carries the final report.
    CleanupFinished(crate::Summary),
    /// The summary block has been written to stdout.
    SummaryPrinted,
}
