// Study assistant

pub const STUDY_SUMMARY_PROMPT: &str = "Summarize the following study material into concise bullet points (3 to 5 points):

Study Material:
{content}

Summary:
";

pub const STUDY_QUIZ_PROMPT: &str = "Based on the following summary, generate 2 multiple-choice quiz questions. Each question should have 4 options, and the correct answer should be clearly marked.

Summary:
{summary}

Format:
1. Question?
   a) Option 1
   b) Option 2
   c) Option 3
   d) Option 4
Answer: <correct option>

2. ...
";

// Career navigator

pub const BACKGROUND_PROFILE_PROMPT: &str = "You are an AI assistant that extracts a structured professional profile from user text.

Text: {user_background}

Output the result as a clear JSON object with keys:
- Education
- Previous Roles
- Years of Experience
- Career Interest
";

pub const SKILL_MAPPING_PROMPT: &str = "You are a Skill Mapping Agent. Based on this professional profile:
{structured_profile}

Map current skills to the new career interest and output 3 sections:
- Transferable Skills
- Obsolete Skills
- Skills Needing Upgrade
";

pub const SKILL_GAP_PROMPT: &str = "You are an expert in career guidance. The user has listed their current skills and wants to transition into {domain}.
Below are the domain's required skills:
{domain_skills}

Here are the user's skills:
{user_skills}

Analyze and categorize the user's skills as:
1. ✅ Transferable
2. ⚠️ Missing (should be learned)
3. ❌ Misaligned or outdated

Respond in a clear, bullet-pointed format with reasoning.";

pub const UNLEARNING_PROMPT: &str = "You are an AI Unlearning Advisor. Based on the user's background and target career domain, suggest what they should consciously unlearn to succeed in the transition.

Background:
{background}

Target Domain:
{target_domain}

Output 5–7 bullet points. For each, include:
- What to unlearn
- Why it's important to let go of it
";

pub const TRACK_RECOMMENDER_PROMPT: &str = "You are a career advisor. Use the following context to suggest learning paths, certifications, or skill-building steps.

Context:
{context}

User Goal:
{query}

Respond with 3-5 personalized learning recommendations.
";

pub const CAREER_NAVIGATION_PROMPT: &str = "You are a Career Transition Assistant.

User Background:
- Education: {education}
- Previous Roles: {roles}
- Interests: {interests}

Extracted Knowledge (from PDF): {rag_context}

Based on this, list:
1. Transferable Skills
2. Obsolete Skills
3. Suggested Learning Tracks
4. Suitable Roles
5. What to unlearn

Answer in simple bullet points, one heading per section followed by its items.
";

// UX prototype generator

pub const UX_DESIGN_PROMPT: &str = "You are a UX research assistant specialized in design pattern extraction. Analyze existing mobile applications related to the following:

- Product Type: '{project}'
- Domain: '{domain}'
- Primary User Activity: '{activity}'
- Target Audience: (assume general unless specified)

Synthesize insights from the retrieved design sources (case studies, Material Design guidelines, UX articles).

### OUTPUT FORMAT:

1. **Top Reference Applications**
List 3-5 mobile/web applications similar to the target product, with platform and what they are known for in UX or functionality.

2. **Key UX Features**
Summarize layout structure, component placement, interaction techniques and visual style highlights.

3. **Ergonomic & Accessibility Highlights**
Point out readability, gesture optimization, color contrast and support for assistive tools.

### ADDITIONAL INSTRUCTIONS:
- Use only insights supported by the retrieved context.
- Provide reference source links where applicable.
- Avoid generic responses or invented app names.
- Keep the full response under 700 tokens.
";

pub const UX_JOURNEY_PROMPT: &str = "You are a UX journey mapping assistant. Based on the following information:

- Product Name: '{project}'
- Domain: '{domain}'
- Primary User Activity: '{activity}'

Create a structured user journey flow that reflects real-world usage and industry-standard UI/UX practices.

### OUTPUT FORMAT (valid JSON only):

Each step includes:
- step_number: sequential number, or nested number for branches (e.g. \"2.1\")
- screen: the name or purpose of the screen
- role: what this screen accomplishes
- action: the user interaction

Include a main flow of 7-12 steps and at least one alternative branch.

### EXAMPLE (partial):
[
  {{
    \"step_number\": 1,
    \"screen\": \"Home\",
    \"role\": \"Greet user and show main CTA\",
    \"action\": \"Tap 'Book Session'\"
  }},
  {{
    \"branch\": {{
      \"condition\": \"User not logged in\",
      \"step_number\": \"1.1\",
      \"screen\": \"Login\",
      \"role\": \"Request authentication\",
      \"action\": \"Enter credentials\"
    }}
  }}
]
";

pub const UX_SCREEN_PROMPT: &str = "You are a UI/UX screen descriptor for mobile applications. Based on the structured user journey below, provide a per-screen breakdown to guide handoff to UI designers or no-code developers.

## CONTEXT:
- App Name: '{project}'
- Domain: '{domain}'
- Primary Activity: '{activity}'
- Journey Flow (JSON):
{flow_schema}

## YOUR TASK:
For each screen in the journey, describe:
1. Screen Name
2. Layout Plan (top / middle / bottom zones)
3. Main UI Components and their role
4. Screen Logic on user interaction
5. User Goals
6. Accessibility Notes (at least one tip)

Return each screen as a numbered list. Do not output code or JSON. Only describe what is implied by the journey flow.
";

pub const UX_STORYBOARD_PROMPT: &str = "You are a storyboard generation assistant. Based on the following app context and screen definitions, create a textual storyboard outlining all screen-to-screen transitions, user triggers, and state changes.

## CONTEXT:
- App Name: '{project}'
- Domain: '{domain}'
- Primary Activity: '{activity}'
- Screen Descriptions:
{screen_descriptions}

## TASK:
Return a numbered list of transitions in the form
`From Screen → trigger → transition style → To Screen`
noting state changes and at least one conditional or error branch, for example
`Booking → submits with empty form → modal error → remains on Booking`.
";

pub const UX_DOCUMENTATION_PROMPT: &str = "You are a professional UX documentation assistant. Compile a complete, developer-ready UI/UX design specification document for the following application.

## CONTEXT:
- App Name: '{project}'
- Domain: '{domain}'
- Primary Activity: '{activity}'
- Design Inspirations:
{inspirations}
- Journey Flow (JSON):
{flow_schema}
- Screen Descriptions:
{screen_descriptions}
- Storyboard:
{storyboard}

## OUTPUT:
Clean Markdown (Notion-compatible) with these sections:
1. Project Overview
2. UI/UX Rationale (per screen)
3. Design Inspirations (from retrieved sources, with links)
4. Journey Flow (entry → process → goal, with branches)
5. Screen Descriptions
6. Storyboard Transitions
7. Developer Checklist (contrast, tab order, aria labels, responsive layout, form validation)
8. Reference Links

Be concise and professional. Tie design choices to known UX heuristics. Do not invent references.
";

/// Wraps a prompt with chunks retrieved for it.
pub const RETRIEVAL_QA_PROMPT: &str = "Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:";
