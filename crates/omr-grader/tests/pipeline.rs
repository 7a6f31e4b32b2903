//! End-to-end runs of the grading pipeline on synthetic sheets.

use image::{Rgb, RgbImage};
use omr_grader::{
    locate_bubbles, BubbleGeometry, GraderParams, Letter, QuestionBox, RawBox, SheetGrader,
};
use omr_grader_core::{BoxRect, GrayImageView, SheetTemplate};

const WIDTH: usize = 1000;
const HEIGHT: usize = 1300;

/// Box rectangles of the full reference sheet, right-most column first.
fn sheet_rects() -> Vec<BoxRect> {
    let template = SheetTemplate::default();
    let xs = [720.0, 490.0, 260.0, 30.0];
    let mut rects = Vec::new();
    for (col, &x) in xs.iter().enumerate() {
        for row in 0..template.column_counts[col] {
            rects.push(BoxRect::new(x, 110.0 + 72.0 * row as f32, 220.0, 64.0));
        }
    }
    rects
}

fn raw_boxes(rects: &[BoxRect]) -> Vec<RawBox> {
    rects
        .iter()
        .enumerate()
        .map(|(index, &rect)| RawBox { rect, index })
        .collect()
}

/// White sheet with a pencil mark drawn on the given bubble of each listed
/// question.
fn synthetic_sheet(marks: &[(u32, usize)]) -> Vec<u8> {
    let mut data = vec![255u8; WIDTH * HEIGHT];
    let rects = sheet_rects();
    let geom = BubbleGeometry::default();
    for &(question, bubble) in marks {
        let qbox = QuestionBox {
            number: question,
            rect: rects[question as usize - 1],
            detected: true,
            source_index: None,
        };
        let set = locate_bubbles(&qbox, &geom);
        let c = set.circles[bubble].center;
        let (cx, cy) = (c.x.round() as i32, c.y.round() as i32);
        for y in cy - 9..cy + 9 {
            for x in cx - 9..cx + 9 {
                data[y as usize * WIDTH + x as usize] = 30;
            }
        }
    }
    data
}

fn view(data: &[u8]) -> GrayImageView<'_> {
    GrayImageView {
        width: WIDTH,
        height: HEIGHT,
        data,
    }
}

#[test]
fn marked_sheet_yields_the_expected_letters() {
    let marks = [(1u32, 0usize), (2, 3), (17, 1), (55, 2)];
    let data = synthetic_sheet(&marks);
    let raw = raw_boxes(&sheet_rects());

    let grader = SheetGrader::with_defaults();
    let report = grader.grade(&view(&data), &raw, 55);

    assert_eq!(report.answers.len(), 55);
    assert_eq!(report.answers.get(1), Some(Some(Letter::A)));
    assert_eq!(report.answers.get(2), Some(Some(Letter::D)));
    assert_eq!(report.answers.get(17), Some(Some(Letter::B)));
    assert_eq!(report.answers.get(55), Some(Some(Letter::C)));
    // untouched questions have no confident mark
    assert_eq!(report.answers.get(30), Some(None));
    assert!(report.boxes.iter().all(|b| b.detected));
}

#[test]
fn missing_detection_is_reconstructed_between_its_neighbors() {
    let data = synthetic_sheet(&[]);
    // drop the rectangle of question 23 from the detector output
    let mut rects = sheet_rects();
    rects.remove(22);
    let raw = raw_boxes(&rects);

    let grader = SheetGrader::new(SheetTemplate::default(), GraderParams::default());
    let report = grader.grade(&view(&data), &raw, 10);

    // a non-canonical count reshuffles the column split, but the box set must
    // still be total with exactly one entry per question
    assert_eq!(report.boxes.len(), 55);
    let mut numbers: Vec<u32> = report.boxes.iter().map(|b| b.number).collect();
    numbers.sort_unstable();
    numbers.dedup();
    assert_eq!(numbers.len(), 55);
    assert!(report.boxes.iter().any(|b| !b.detected));
}

#[test]
fn zero_detections_still_produce_a_complete_result() {
    let data = synthetic_sheet(&[]);
    let grader = SheetGrader::with_defaults();
    let report = grader.grade(&view(&data), &[], 10);

    // ten sentinel entries, nothing more
    assert_eq!(report.answers.len(), 10);
    for q in 1..=10 {
        assert_eq!(report.answers.get(q), Some(None), "question {q}");
    }
    assert_eq!(report.answers.get(11), None);

    // every box reconstructed
    assert_eq!(report.boxes.len(), 55);
    assert!(report.boxes.iter().all(|b| !b.detected));

    // the review image is still produced, with reconstruction flags
    let mut canvas = RgbImage::from_pixel(WIDTH as u32, HEIGHT as u32, Rgb([255, 255, 255]));
    grader.annotate(&mut canvas, &report);
    let flagged = canvas.pixels().filter(|&&p| p == Rgb([255, 0, 0])).count();
    assert!(flagged > 0, "reconstruction markers drawn");
}

#[test]
fn check_bound_limits_the_answer_map() {
    let marks = [(1u32, 0usize), (40, 1)];
    let data = synthetic_sheet(&marks);
    let raw = raw_boxes(&sheet_rects());

    let grader = SheetGrader::with_defaults();
    let report = grader.grade(&view(&data), &raw, 20);

    assert_eq!(report.answers.len(), 20);
    assert_eq!(report.answers.get(1), Some(Some(Letter::A)));
    // question 40 is beyond the bound: present on the sheet, not in the map
    assert_eq!(report.answers.get(40), None);
}
