use rand::Rng;

/// Initials of the first three words, uppercased, followed by a random number in 100..=999.
pub fn generate_course_code<R: Rng>(title: &str, rng: &mut R) -> String {
    let initials: String = title
        .split_whitespace()
        .take(3)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    format!("{}{}", initials, rng.gen_range(100..=999u16))
}
