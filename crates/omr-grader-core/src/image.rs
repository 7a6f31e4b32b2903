/// Borrowed grayscale image, row-major, `data.len() == width * height`.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

impl<'a> GrayImageView<'a> {
    /// Mean intensity over the square patch of half-size `half` centered at
    /// `(cx, cy)`, clipped to the image bounds.
    ///
    /// The patch covers `[c - half, c + half)` on each axis, so `half = 6`
    /// samples a 12x12 window. Returns `None` when the clipped patch is
    /// empty, i.e. the center lies fully outside the image or `half <= 0`;
    /// callers treat that as a maximally bright (unmarked) reading.
    pub fn mean_patch(&self, cx: i32, cy: i32, half: i32) -> Option<f32> {
        let x0 = (cx - half).max(0);
        let y0 = (cy - half).max(0);
        let x1 = (cx + half).min(self.width as i32);
        let y1 = (cy + half).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        let mut sum = 0u64;
        for y in y0..y1 {
            let start = y as usize * self.width;
            let row = &self.data[start + x0 as usize..start + x1 as usize];
            sum += row.iter().map(|&p| u64::from(p)).sum::<u64>();
        }
        let count = ((x1 - x0) * (y1 - y0)) as u64;
        Some(sum as f32 / count as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform(width: usize, height: usize, value: u8) -> Vec<u8> {
        vec![value; width * height]
    }

    #[test]
    fn mean_of_uniform_patch() {
        let data = uniform(20, 20, 80);
        let view = GrayImageView {
            width: 20,
            height: 20,
            data: &data,
        };
        assert_relative_eq!(view.mean_patch(10, 10, 3).unwrap(), 80.0);
    }

    #[test]
    fn patch_is_clipped_at_borders() {
        let mut data = uniform(10, 10, 200);
        // darken the top-left corner pixel
        data[0] = 0;
        let view = GrayImageView {
            width: 10,
            height: 10,
            data: &data,
        };
        // centered on the corner: only the 2x2 in-bounds quarter remains
        let mean = view.mean_patch(0, 0, 2).unwrap();
        assert_relative_eq!(mean, (0.0 + 200.0 * 3.0) / 4.0);
    }

    #[test]
    fn fully_outside_patch_is_none() {
        let data = uniform(10, 10, 128);
        let view = GrayImageView {
            width: 10,
            height: 10,
            data: &data,
        };
        assert!(view.mean_patch(-20, 5, 3).is_none());
        assert!(view.mean_patch(5, 100, 3).is_none());
        assert!(view.mean_patch(5, 5, 0).is_none());
    }
}
