/// Frame-strip animation state. Pure counter math, no canvas involvement:
/// the owning sprite maps `current_frame` to a horizontal slice of its image.
#[derive(Debug, Clone)]
pub struct Animator {
    frames: u32,
    frame_buffer: u32,
    current_frame: u32,
    elapsed_frames: u32,
    looping: bool,
    playing: bool,
    completed: bool,
}

impl Animator {
    pub fn new(frames: u32, frame_buffer: u32, looping: bool, playing: bool) -> Self {
        Animator {
            frames: frames.max(1),
            frame_buffer: frame_buffer.max(1),
            current_frame: 0,
            elapsed_frames: 0,
            looping,
            playing,
            completed: false,
        }
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn elapsed_frames(&self) -> u32 {
        self.elapsed_frames
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn set_frames(&mut self, frames: u32) {
        self.frames = frames.max(1);
    }

    pub fn set_frame_buffer(&mut self, frame_buffer: u32) {
        self.frame_buffer = frame_buffer.max(1);
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Rewinds to frame 0 and re-arms the completion notification. The
    /// elapsed counter deliberately keeps running across switches.
    pub fn rewind(&mut self) {
        self.current_frame = 0;
        self.completed = false;
    }

    /// Advances the animation by one render tick. Every `frame_buffer`-th
    /// tick moves to the next frame; the last frame wraps to 0 when looping,
    /// otherwise holds. Returns true the first time the last frame is
    /// reached since construction or the last [`rewind`](Self::rewind), so
    /// the caller can fire a completion callback exactly once.
    pub fn advance(&mut self) -> bool {
        if !self.playing {
            return false;
        }

        self.elapsed_frames += 1;
        if self.elapsed_frames % self.frame_buffer == 0 {
            if self.current_frame < self.frames - 1 {
                self.current_frame += 1;
            } else if self.looping {
                self.current_frame = 0;
            }
        }

        if self.current_frame == self.frames - 1 && !self.completed {
            self.completed = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_returns_to_frame_zero() {
        // frames=4, frame_buffer=3, looping: 12 ticks walk 0→1→2→3→0
        let mut animator = Animator::new(4, 3, true, true);
        let mut seen = vec![animator.current_frame()];
        for _ in 0..12 {
            animator.advance();
            if seen.last() != Some(&animator.current_frame()) {
                seen.push(animator.current_frame());
            }
        }
        assert_eq!(animator.current_frame(), 0);
        assert_eq!(seen, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn buffer_times_frames_ticks_complete_one_loop() {
        for (buffer, frames) in [(1, 2), (2, 5), (3, 4), (7, 3)] {
            let mut animator = Animator::new(frames, buffer, true, true);
            for _ in 0..buffer * frames {
                animator.advance();
            }
            assert_eq!(
                animator.current_frame(),
                0,
                "buffer={} frames={}",
                buffer,
                frames
            );
        }
    }

    #[test]
    fn non_looping_animation_holds_the_last_frame() {
        let mut animator = Animator::new(4, 2, false, true);
        for _ in 0..100 {
            animator.advance();
            assert!(animator.current_frame() <= 3);
        }
        assert_eq!(animator.current_frame(), 3);
    }

    #[test]
    fn paused_animator_does_not_move() {
        let mut animator = Animator::new(4, 1, true, false);
        for _ in 0..10 {
            animator.advance();
        }
        assert_eq!(animator.current_frame(), 0);
        assert_eq!(animator.elapsed_frames(), 0);
    }

    #[test]
    fn play_resumes_where_pause_left_off() {
        let mut animator = Animator::new(4, 1, true, true);
        animator.advance();
        animator.pause();
        animator.advance();
        assert_eq!(animator.current_frame(), 1);
        animator.play();
        animator.advance();
        assert_eq!(animator.current_frame(), 2);
    }

    #[test]
    fn completion_is_reported_exactly_once() {
        let mut animator = Animator::new(3, 1, false, true);
        let mut completions = 0;
        for _ in 0..10 {
            if animator.advance() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
    }

    #[test]
    fn rewind_rearms_completion() {
        let mut animator = Animator::new(3, 1, false, true);
        while !animator.advance() {}
        animator.rewind();
        let mut completions = 0;
        for _ in 0..10 {
            if animator.advance() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(animator.current_frame(), 2);
    }

    #[test]
    fn single_frame_animation_completes_on_the_first_tick() {
        let mut animator = Animator::new(1, 3, true, true);
        assert!(animator.advance());
        assert_eq!(animator.current_frame(), 0);
    }

    #[test]
    fn rewind_keeps_the_elapsed_counter() {
        let mut animator = Animator::new(4, 3, true, true);
        animator.advance();
        animator.advance();
        animator.rewind();
        assert_eq!(animator.elapsed_frames(), 2);
        // next tick is the third elapsed frame, so it advances immediately
        animator.advance();
        assert_eq!(animator.current_frame(), 1);
    }
}
