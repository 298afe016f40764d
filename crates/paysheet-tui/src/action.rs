/// Everything the terminal can ask of the app, after key mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    GoTop,
    GoBottom,
    /// Enter: open the sheet on the main screen, toggle the row in the sheet.
    DrillIn,
    /// Esc: dismiss the sheet.
    NavigateBack,
    OpenPayment,
    ToggleSelect,
    Refresh,
    /// "Done" in the sheet.
    Done,
    Finish,
    StartSearch,
    SearchInput(char),
    SearchBackspace,
    SearchCancel,
    SearchConfirm,
    Tick,
    None,
}
