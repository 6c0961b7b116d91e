/// Vertical scroll position over the rendered conversation lines.
///
/// While `follow` is set the position sticks to the newest content, even as
/// the line count grows between frames.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scroll {
    pub position: usize,
    list_length: usize,
    viewport_length: usize,
    follow: bool,
}

impl Scroll {
    fn max_position(&self) -> usize {
        return self.list_length.saturating_sub(self.viewport_length);
    }

    pub fn set_state(&mut self, list_length: usize, viewport_length: usize) {
        self.list_length = list_length;
        self.viewport_length = viewport_length;

        if self.follow || self.position > self.max_position() {
            self.position = self.max_position();
        }
    }

    pub fn last(&mut self) {
        self.follow = true;
        self.position = self.max_position();
    }

    pub fn is_position_at_last(&self) -> bool {
        return self.position >= self.max_position();
    }

    pub fn up(&mut self) {
        self.up_by(1);
    }

    pub fn down(&mut self) {
        self.down_by(1);
    }

    pub fn up_page(&mut self) {
        self.up_by(self.viewport_length.max(1));
    }

    pub fn down_page(&mut self) {
        self.down_by(self.viewport_length.max(1));
    }

    fn up_by(&mut self, amount: usize) {
        self.follow = false;
        self.position = self.position.saturating_sub(amount);
    }

    fn down_by(&mut self, amount: usize) {
        self.position = (self.position + amount).min(self.max_position());
        self.follow = self.is_position_at_last();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_growing_content() {
        let mut scroll = Scroll::default();
        scroll.last();
        scroll.set_state(30, 10);
        assert_eq!(scroll.position, 20);

        scroll.set_state(35, 10);
        assert_eq!(scroll.position, 25);
    }

    #[test]
    fn test_scrolling_up_stops_following() {
        let mut scroll = Scroll::default();
        scroll.last();
        scroll.set_state(30, 10);
        scroll.up();
        scroll.set_state(40, 10);
        assert_eq!(scroll.position, 19);
        assert!(!scroll.is_position_at_last());
    }

    #[test]
    fn test_scrolling_down_to_bottom_resumes_following() {
        let mut scroll = Scroll::default();
        scroll.set_state(30, 10);
        scroll.down_page();
        scroll.down_page();
        scroll.down_page();
        assert_eq!(scroll.position, 20);

        scroll.set_state(31, 10);
        assert_eq!(scroll.position, 21);
    }

    #[test]
    fn test_short_content_stays_at_top() {
        let mut scroll = Scroll::default();
        scroll.last();
        scroll.set_state(3, 10);
        assert_eq!(scroll.position, 0);
        scroll.up_page();
        assert_eq!(scroll.position, 0);
    }
}
