use super::sprite::SpriteHandle;

/// Cards currently held, in fan order. The order only changes through the
/// explicit insert/remove calls here; layout never reorders it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<SpriteHandle>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: SpriteHandle) {
        self.cards.push(card);
    }

    pub fn insert(&mut self, position: usize, card: SpriteHandle) {
        let position = position.min(self.cards.len());
        self.cards.insert(position, card);
    }

    /// Remove a card, returning its former position.
    pub fn remove(&mut self, card: SpriteHandle) -> Option<usize> {
        let position = self.cards.iter().position(|&c| c == card)?;
        self.cards.remove(position);
        Some(position)
    }

    pub fn pop(&mut self) -> Option<SpriteHandle> {
        self.cards.pop()
    }

    pub fn cards(&self) -> &[SpriteHandle] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SpriteHandle> + '_ {
        self.cards.iter().copied()
    }
}
