use mc_cards::Hole;

pub type Chips = i64;

#[derive(Debug, Clone)]
pub struct Seat {
    pub stack: Chips,
    pub bet: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub hole: Option<Hole>,
}

impl Seat {
    pub fn new(stack: Chips) -> Self {
        Self {
            stack,
            bet: 0,
            folded: false,
            all_in: false,
            hole: None,
        }
    }

    pub fn contesting(&self) -> bool {
        !self.folded
    }

    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }
}
