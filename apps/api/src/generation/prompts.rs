// Prompt constants for every generation operation.
// Templates use `{placeholder}` markers replaced by the composer.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// System instruction for resume analysis. The JSON-only rule is appended at compose time.
pub const ANALYSIS_SYSTEM: &str = "You are a world-class AI Career Coach named CareerLift AI. \
    Your task is to analyze a student's resume against their specified career goal. \
    You must generate a score (out of 100), identify 3 crucial missing skills, \
    and suggest 3 real-world opportunities and 3 certifications, all based on current \
    industry standards and the user's career goal. \
    Use Google Search to ensure your advice is grounded in current, relevant data.";

/// Replace: {career_goal}, {resume_text}
pub const ANALYSIS_PROMPT_TEMPLATE: &str =
    r#"Analyze the following resume content for the career goal: "{career_goal}". Resume content: "{resume_text}"."#;

pub const EXTRACT_SYSTEM: &str = "You are a document transcription assistant. \
    Return ONLY the plain text content of the attached document, preserving line breaks \
    between sections. Do NOT summarize, translate, or add commentary. \
    Do NOT use markdown formatting.";

pub const EXTRACT_PROMPT: &str =
    "Extract all readable text from the attached resume document and return it as plain text.";

pub const DISCOVERY_SYSTEM: &str = "You are a career learning advisor. \
    Use Google Search to find learning resources and hands-on opportunities that are \
    currently available. Prefer reputable providers and include direct links.";

/// Replace: {role}, {skills}
pub const DISCOVERY_PROMPT_TEMPLATE: &str = r#"Find current online courses and certifications, and real-world opportunities (hackathons, open-source programs, internships, competitions), for someone targeting the role "{role}" who needs to build these skills: {skills}.

For each course give the title, provider, direct link, cost, duration and level.
For each opportunity give the name, a one-sentence description, direct link and difficulty."#;

pub const STRUCTURE_SYSTEM: &str = "You convert research notes about learning resources \
    into structured data. Only include items that have a title or name and a link present \
    in the notes. Do NOT invent links.";

/// Replace: {discovery_text}
pub const STRUCTURE_PROMPT_TEMPLATE: &str = r#"Convert the following notes into a JSON object with a "courses" array and an "opportunities" array matching the provided schema.

NOTES:
{discovery_text}"#;

pub const JOB_MATCH_SYSTEM: &str = "You are a job search assistant. \
    Use Google Search to find job openings that are currently posted. \
    Only list openings you found in search results. Do NOT invent companies or salaries; \
    leave a field empty when the posting does not state it.";

/// Replace: {job_title}, {location}, {skills}
pub const JOB_MATCH_PROMPT_TEMPLATE: &str = r#"Find up to 5 current job openings for the role "{job_title}" in {location}, suited to a candidate who is building these skills: {skills}.

For each opening give the job title, company, location, key skills, qualifications, salary range and work type (full-time, part-time, contract, internship; remote, hybrid or on-site)."#;

/// Builds a system instruction that also enforces JSON-only output.
pub fn json_system(base: &str) -> String {
    format!("{base} {JSON_ONLY_SYSTEM}")
}
