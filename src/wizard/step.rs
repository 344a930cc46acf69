/// The four wizard steps, in their strict forward order. Refinement loops back
/// to Review, so there is no terminal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Input,
    Choose,
    Review,
    ChooseRefinement,
}

impl Step {
    /// The inverse of the last forward transition. Input has no predecessor
    /// and stays put.
    pub fn back(self) -> Step {
        match self {
            Step::Input => Step::Input,
            Step::Choose => Step::Input,
            Step::Review => Step::Choose,
            Step::ChooseRefinement => Step::Review,
        }
    }
}
