#[cfg(feature = "tracing_debug")]
use tracing::debug;

const INDENT_WIDTH: usize = 2;
const PADDING_WIDTH: usize = 2;

// We'll target 95% of the total width, to ensure the renderer doesn't literally use the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

/// Renders `label  description` rows, with every label padded to the same width.
#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    left: usize,
    middle: Option<usize>,
}

impl ColumnRenderer {
    /// Produce a renderer for labels of (at most) `left` width.
    /// With a `total_width`, descriptions wrap to fit; otherwise they are never wrapped.
    pub(crate) fn guided(left: usize, total_width: Option<usize>) -> Self {
        let middle = total_width.map(|total_width| {
            let non_middle = INDENT_WIDTH + left + PADDING_WIDTH;
            let target_total_width = (total_width as f64 * TARGET_TOTAL_FACTOR) as usize;

            if non_middle + MINIMUM_MIDDLE_WIDTH <= target_total_width {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Columns {non_middle} fit within the target total {target_total_width}.  Selecting middle: {}.", target_total_width - non_middle);
                }

                target_total_width - non_middle
            } else {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Columns {non_middle} do not fit within the target total {target_total_width}.  Selecting middle: {MINIMUM_MIDDLE_WIDTH}.");
                }

                MINIMUM_MIDDLE_WIDTH
            }
        });

        Self { left, middle }
    }

    pub(crate) fn render(&self, left: &str, middle: &str) -> Vec<String> {
        let indent = INDENT_WIDTH;
        let left_column_width = self.left;
        let padding = " ".repeat(PADDING_WIDTH);

        if middle.is_empty() {
            return vec![format!("{:indent$}{left}", "")];
        }

        let middle_parts = match self.middle {
            Some(width) => chunk(middle, width),
            None => vec![middle.to_string()],
        };

        middle_parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let label = if i == 0 { left } else { "" };
                format!("{:indent$}{label:left_column_width$}{padding}{part}", "")
            })
            .collect()
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ') {
        if !word.is_empty() {
            if current.is_empty() {
                hyphenate(width, &mut lines, &mut current, word);
            } else if current.chars().count() + word.chars().count() < width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = String::default();
                hyphenate(width, &mut lines, &mut current, word);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let increment = width - 1;
    let characters: Vec<char> = word.chars().collect();
    let mut left = 0;

    while characters.len() - left > width {
        let piece: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{piece}-"));
        left += increment;
    }

    current.extend(characters[left..].iter());
}

pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, message: String);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, message: String) {
        eprintln!("{message}");
    }
}
