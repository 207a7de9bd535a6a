use super::model::{Book, CurriculumRow};

/// (district, school, grade, curriculum, module, essential question, books, start, end)
type SampleRow = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static [&'static str], &'static str, &'static str);

const SAMPLE: &[SampleRow] = &[
    (
        "Northside ISD", "Maple Elementary", "3", "HMH Into Reading",
        "Module 3: Characters Shape Stories",
        "How do characters\u{2019} actions drive a story forward?",
        &["Because of Winn-Dixie", "Aero and Officer Mike"],
        "2025-01-06", "2025-02-07",
    ),
    (
        "Northside ISD", "Oak Elementary", "2", "EL Education",
        "Module 2: Fossils Tell of Earth\u{2019}s Changes",
        "What can we learn from fossils?",
        &["The Dog That Dug for Dinosaurs", "Fossils"],
        "2025-02-10", "2025-03-21",
    ),
    (
        "Northside ISD", "Oak Elementary", "5", "Wit & Wisdom",
        "Module 1: Resilience in the Great Depression",
        "How do people show resilience in hard times?",
        &["Bud, Not Buddy", "Children of the Great Depression"],
        "2024-10-01", "2024-11-08",
    ),
    (
        "East Valley SD", "Roosevelt Elementary", "4", "HMH Into Reading",
        "Module 4: Problem Solvers",
        "How do people solve everyday problems?",
        &["The Boy Who Harnessed the Wind (Young Readers)", "One Plastic Bag"],
        "2025-03-03", "2025-04-04",
    ),
    (
        "East Valley SD", "Lakeside Elementary", "3", "EL Education",
        "Module 3: Learning from the Past",
        "How can we learn from people in the past?",
        &["Peter Pan", "My Librarian Is a Camel"],
        "2025-01-13", "2025-02-21",
    ),
    (
        "East Valley SD", "Lakeside Elementary", "5", "Wit & Wisdom",
        "Module 2: Liberty!",
        "What does it mean to be free?",
        &["The Red Bandanna (Young Readers)", "Answering the Cry for Freedom"],
        "2025-02-24", "2025-03-28",
    ),
    (
        "River City PS", "Lincoln Middle", "6", "Wit & Wisdom",
        "Module 1: The Hero\u{2019}s Journey",
        "What makes a hero?",
        &["The Lightning Thief", "The Hero\u{2019}s Journey (excerpts)"],
        "2025-01-06", "2025-02-14",
    ),
    (
        "River City PS", "Jefferson Middle", "6", "EL Education",
        "Module 1: Climate Science",
        "How does climate change impact our world?",
        &["Fossil Fuel Frenzy", "Articles & Reports"],
        "2025-09-02", "2025-10-10",
    ),
    (
        "River City PS", "Jefferson Middle", "5", "HMH Into Reading",
        "Module 2: Inventors at Work",
        "How do inventions change our lives?",
        &["The Invention of Hugo Cabret", "The Boy Who Invented TV"],
        "2025-10-13", "2025-11-21",
    ),
    (
        "Northside ISD", "Maple Elementary", "2", "HMH Into Reading",
        "Module 2: Nature Watchers",
        "How does nature inspire us?",
        &["A Seed Is Sleepy", "Owl Moon"],
        "2024-11-18", "2024-12-20",
    ),
    (
        "East Valley SD", "Roosevelt Elementary", "3", "Wit & Wisdom",
        "Module 2: American Art & Identity",
        "How does art tell a story about who we are?",
        &["Come Look With Me: American Art", "Artist biographies"],
        "2025-01-06", "2025-02-14",
    ),
];

/// The bundled dataset used when no source is configured or loading fails.
pub fn sample_rows() -> Vec<CurriculumRow> {
    SAMPLE
        .iter()
        .map(|&(district, school, grade, curriculum, module, eq, books, start, end)| CurriculumRow {
            district: district.to_string(),
            school: school.to_string(),
            grade: grade.to_string(),
            curriculum: curriculum.to_string(),
            module: module.to_string(),
            essential_question: eq.to_string(),
            genres: Vec::new(),
            books: books.iter().map(|b| Book::titled(*b)).collect(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        })
        .collect()
}
