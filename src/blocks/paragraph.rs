use super::Drawable;
use crate::canvas::Canvas;
use crate::error::Result;
use crate::fonts::{self, FontMetrics};
use crate::style::{Rect, TextAlignment, TextStyle};

const DEFAULT_LINE_HEIGHT: f32 = 1.2;
const FIT_TOLERANCE: f32 = 1e-3;

/// Styled text wrapped greedily at word boundaries.
///
/// A `\n` in the text always starts a new line. Words longer than the available
/// width are not split; they overflow on a line of their own.
#[derive(Debug, Clone)]
pub struct Paragraph {
    text: String,
    style: TextStyle,
    alignment: TextAlignment,
    line_height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub width: f32,
}

/// One wrapped line of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub words: Vec<Word>,
    /// Width with single spaces between words.
    pub width: f32,
    /// True for the last line before a `\n` or the end of the text.
    pub ends_paragraph: bool,
}

impl Line {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Paragraph {
    pub fn new<S: Into<String>>(text: S, style: TextStyle) -> Paragraph {
        Paragraph {
            text: text.into(),
            style,
            alignment: TextAlignment::Left,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }

    pub fn with_alignment(self, alignment: TextAlignment) -> Paragraph {
        Paragraph { alignment, ..self }
    }

    /// Line pitch as a multiple of the font size.
    pub fn with_line_height(self, line_height: f32) -> Paragraph {
        Paragraph {
            line_height,
            ..self
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    pub fn line_pitch(&self) -> f32 {
        self.style.size * self.line_height
    }

    pub fn lines(&self, width: f32, fonts: &dyn FontMetrics) -> Result<Vec<Line>> {
        let TextStyle { font, size, .. } = self.style;
        let space = fonts::width_of_text(fonts, " ", font, size)?;

        let mut lines = Vec::new();
        for source_line in self.text.split('\n') {
            let mut words: Vec<Word> = Vec::new();
            let mut line_width = 0.0;

            for text in source_line.split_whitespace() {
                let word_width = fonts::width_of_text(fonts, text, font, size)?;
                let candidate = if words.is_empty() {
                    word_width
                } else {
                    line_width + space + word_width
                };

                if candidate > width + FIT_TOLERANCE && !words.is_empty() {
                    lines.push(Line {
                        words: std::mem::take(&mut words),
                        width: line_width,
                        ends_paragraph: false,
                    });
                    line_width = word_width;
                } else {
                    line_width = candidate;
                }
                words.push(Word {
                    text: text.to_string(),
                    width: word_width,
                });
            }

            lines.push(Line {
                words,
                width: line_width,
                ends_paragraph: true,
            });
        }
        Ok(lines)
    }
}

impl Drawable for Paragraph {
    fn height(&self, width: f32, fonts: &dyn FontMetrics) -> Result<f32> {
        Ok(self.lines(width, fonts)?.len() as f32 * self.line_pitch())
    }

    fn natural_width(&self, width: f32, fonts: &dyn FontMetrics) -> Result<f32> {
        let widest = self
            .lines(width, fonts)?
            .iter()
            .fold(0.0_f32, |acc, line| acc.max(line.width));
        Ok(widest.min(width))
    }

    fn paint(&self, canvas: &mut Canvas, frame: Rect, fonts: &dyn FontMetrics) -> Result<()> {
        let TextStyle { font, size, colour } = self.style;
        let ascent = fonts::ascent(fonts, font, size);
        let pitch = self.line_pitch();

        for (i, line) in self.lines(frame.width, fonts)?.iter().enumerate() {
            if line.words.is_empty() {
                continue;
            }
            let baseline = frame.y + i as f32 * pitch + ascent;

            let justify = self.alignment == TextAlignment::Justify
                && !line.ends_paragraph
                && line.words.len() > 1;
            if justify {
                let inked: f32 = line.words.iter().map(|w| w.width).sum();
                let gap = (frame.width - inked) / (line.words.len() - 1) as f32;
                let mut x = frame.x;
                for word in &line.words {
                    canvas.text(x, baseline, font, size, colour, word.text.as_str());
                    x += word.width + gap;
                }
                continue;
            }

            let x = match self.alignment {
                TextAlignment::Left | TextAlignment::Justify => frame.x,
                TextAlignment::Centre => frame.x + (frame.width - line.width) / 2.0,
                TextAlignment::Right => frame.right() - line.width,
            };
            canvas.text(x, baseline, font, size, colour, line.text());
        }
        Ok(())
    }
}
