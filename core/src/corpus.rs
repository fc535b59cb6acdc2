use serde::{Deserialize, Serialize};

/// One corpus entry. Immutable once created; ids are unique within a corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), content: content.into() }
    }
}

/// The built-in demo corpus: fifteen short essays, enough to give the
/// encoder a real vocabulary and the hosted index something to rank.
pub fn demo_essays() -> Vec<Document> {
    vec![
        Document::new(
            "1",
            "The Impact of Technology on Society",
            "Technology has profoundly transformed modern society in various aspects. From communication and education to healthcare and industry, technological advancements have streamlined processes, improved efficiency, and enhanced the quality of life. However, technology has also raised concerns related to privacy, cybersecurity, and societal dependence on digital tools. Striking a balance between leveraging technology for progress and addressing its challenges remains a priority.",
        ),
        Document::new(
            "2",
            "Climate Change and Its Global Effects",
            "Climate change poses a significant threat to the environment and human life. The increase in global temperatures, rising sea levels, and frequent natural disasters are all consequences of climate change. Mitigation efforts, such as reducing carbon emissions, promoting sustainable practices, and adopting renewable energy sources, are crucial to curbing its effects and ensuring a safer planet for future generations.",
        ),
        Document::new(
            "3",
            "The Importance of Mental Health Awareness",
            "Mental health is as important as physical health, yet it remains stigmatized in many societies. Raising awareness about mental health issues can help individuals seek timely support and reduce the stigma associated with mental illness. Ensuring accessible mental health care and promoting well-being are essential for building a healthy and inclusive society.",
        ),
        Document::new(
            "4",
            "The Future of Artificial Intelligence",
            "Artificial Intelligence (AI) is rapidly advancing, reshaping industries and daily life. From autonomous vehicles to personalized healthcare, AI's potential is immense. However, ethical considerations, including job displacement, privacy concerns, and bias in algorithms, need to be addressed to ensure AI serves humanity positively.",
        ),
        Document::new(
            "5",
            "The Role of Education in Personal Growth",
            "Education is a powerful tool that empowers individuals with knowledge, skills, and critical thinking. It plays a fundamental role in personal growth, career opportunities, and social development. Accessible and quality education should be a priority for all societies to promote equality and progress.",
        ),
        Document::new(
            "6",
            "The Benefits of Physical Exercise",
            "Regular physical exercise is essential for maintaining a healthy body and mind. It improves cardiovascular health, boosts mood, enhances cognitive function, and reduces the risk of various diseases. Incorporating exercise into daily routines is a proactive approach to enhancing overall well-being.",
        ),
        Document::new(
            "7",
            "The Importance of Environmental Conservation",
            "Preserving the natural environment is crucial for sustaining biodiversity, mitigating climate change, and ensuring future generations' survival. Conservation efforts, such as reforestation, wildlife protection, and reducing plastic pollution, are vital for promoting ecological balance.",
        ),
        Document::new(
            "8",
            "The Influence of Social Media on Youth",
            "Social media has revolutionized how people interact and communicate. While it offers opportunities for self-expression and connection, excessive use can harm mental health, self-esteem, and productivity. Encouraging responsible usage is essential for fostering a positive digital environment.",
        ),
        Document::new(
            "9",
            "The Evolution of Work in the Digital Age",
            "The digital age has transformed traditional work structures, promoting remote work, gig economy platforms, and automation. While these changes offer flexibility and efficiency, they also raise concerns about job security, work-life balance, and fair wages. Preparing for the future of work requires adapting to technological advancements and prioritizing employee well-being.",
        ),
        Document::new(
            "10",
            "The Power of Positive Thinking",
            "Positive thinking can significantly impact an individual's mental and physical health. Cultivating an optimistic mindset promotes resilience, reduces stress, and enhances overall well-being. By focusing on solutions rather than problems, individuals can lead more fulfilling lives.",
        ),
        Document::new(
            "11",
            "The Benefits of Multilingualism",
            "Learning multiple languages offers cognitive, social, and cultural benefits. It enhances memory, improves problem-solving skills, and opens up new opportunities for personal and professional growth. Embracing multilingualism fosters greater empathy and understanding among diverse communities.",
        ),
        Document::new(
            "12",
            "The Ethics of Genetic Engineering",
            "Genetic engineering holds the potential to cure genetic disorders and improve crop yields. However, ethical concerns arise regarding its impact on natural evolution, biodiversity, and societal inequalities. Establishing guidelines and ethical standards is essential to ensure responsible scientific advancement.",
        ),
        Document::new(
            "13",
            "The Rise of Remote Work",
            "Remote work has gained popularity due to technological advancements and the global pandemic. While it offers flexibility and work-life balance, it also poses challenges related to communication, collaboration, and employee engagement. Companies must adapt to this evolving work culture.",
        ),
        Document::new(
            "14",
            "The Impact of Fast Fashion",
            "The fast fashion industry offers affordable clothing but at a high environmental and ethical cost. Overproduction, textile waste, and exploitative labor practices are significant issues. Advocating for sustainable fashion can help reduce the industry's negative impact.",
        ),
        Document::new(
            "15",
            "The Power of Storytelling",
            "Storytelling is a powerful tool for communication, education, and preserving cultural heritage. It allows individuals to convey ideas, emotions, and experiences, creating connections between people. Harnessing storytelling effectively can inspire and bring about social change.",
        ),
    ]
}
