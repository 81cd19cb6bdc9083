use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Sermon {
    pub id: &'static str,
    pub title: &'static str,
    pub pastor: &'static str,
    pub preached_on: NaiveDate,
    pub scripture: &'static str,
    pub summary: &'static str,
    pub questions: Vec<ReflectionQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReflectionQuestion {
    pub id: &'static str,
    // 1-based display order
    pub position: u32,
    pub prompt: &'static str,
}

/// The fixed record used to seed a demo environment.
pub fn sample_sermon() -> Sermon {
    let prompts = [
        "Who has been a neighbor to you when you least expected it?",
        "What keeps you from stopping for someone in need?",
        "Name one person you can show mercy to this week.",
    ];

    let questions = prompts
        .into_iter()
        .zip(["q-good-samaritan-1", "q-good-samaritan-2", "q-good-samaritan-3"])
        .zip(1u32..)
        .map(|((prompt, id), position)| ReflectionQuestion {
            id,
            position,
            prompt,
        })
        .collect();

    Sermon {
        id: "sermon-good-samaritan",
        title: "Who Is My Neighbor?",
        pastor: "Pastor Ruth Okafor",
        // a constant, always in range
        preached_on: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap_or_default(),
        scripture: "Luke 10:25-37",
        summary: "Jesus answers a lawyer's question with a story about a Samaritan \
                  who stops for a wounded stranger, turning 'who is my neighbor?' into \
                  'who acted as a neighbor?'.",
        questions,
    }
}
