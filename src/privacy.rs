use crate::phone;

const MASK: char = '*';

/// `Ali Veli` becomes `A*i V**i`.
pub fn censor_name(name: &str) -> String {
    name.split_whitespace()
        .map(censor_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn censor_word(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    match chars.len() {
        0 | 1 => MASK.to_string(),
        2 => format!("{}{MASK}", chars[0]),
        len => {
            let mut masked = String::with_capacity(word.len());
            masked.push(chars[0]);
            masked.extend(std::iter::repeat(MASK).take(len - 2));
            masked.push(chars[len - 1]);
            masked
        }
    }
}

/// Shows the first digit and the last two digits of the phone key.
pub fn censor_phone(raw: &str) -> String {
    let key = phone::normalize(raw);
    let digits: Vec<char> = key.chars().collect();
    match digits.len() {
        0 => String::new(),
        len if len < 3 => MASK.to_string().repeat(len),
        len => {
            let mut masked = String::with_capacity(len);
            masked.push(digits[0]);
            masked.extend(std::iter::repeat(MASK).take(len - 3));
            masked.extend(&digits[len - 2..]);
            masked
        }
    }
}
