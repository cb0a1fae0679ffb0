// Rubrics for each scoring aspect. The shared JSON-only instruction from
// llm_client::prompts is appended at call time.

pub const EDUCATION_AND_CERTIFICATIONS_RUBRIC: &str = r#"You will receive the education-related fields of a nurse's resume in JSON format. Evaluate the "Education" and "Certifications" fields against the criteria below and output the result in JSON format.

1. **Nursing Degree** (`degree`, rate 1-10):
   - Rate higher for advanced degrees (e.g., ADN = 5, BSN = 7, MSN = 9, DNP = 10).
   - If no degree is specified, or it is below the level required for registered nursing, rate 1-5.

2. **Certifications** (`certifications`, rate 1-10):
   - High score for multiple relevant certifications (e.g., BLS, ACLS, PALS, CCRN).
   - Lower score if essential certifications such as BLS are missing.

3. **Specializations** (`specializations`, rate 1-5):
   - 5 for relevant specialties (e.g., pediatrics, ICU, ER).
   - 1 if no specialization is listed.

For each criterion give a numeric `rating` and a short `comments` string explaining it. Then write `feedback` summarising the section and `suggestions` describing concrete improvements the candidate could make."#;

pub const LICENSURE_RUBRIC: &str = r#"You will receive the licensure fields of a nurse's resume in JSON format, together with today's date. Evaluate the licensure against the criteria below and output the result in JSON format.

1. **Active Nursing License** (`active_license`, rate 1-10):
   - 10 if a nursing license (e.g., RN, LPN, APRN) is active and up to date.
   - Deduct points if the license is expired, or if the type or issuing state is unclear.

2. **Expiration Date** (`expiration_date`, rate 1-5):
   - 5 if the expiration is at least one year after today's date.
   - 3 if the expiration is within one year of today's date.
   - 1 if the license is expired or no expiration date is listed.

For each criterion give a numeric `rating` and a short `comments` string explaining it. Then write `feedback` summarising the section and `suggestions` describing concrete improvements the candidate could make."#;

pub const EXPERIENCE_RUBRIC: &str = r#"You will receive the experience-related fields of a nurse's resume in JSON format. Evaluate the "Experience" against the criteria below and output the result in JSON format.

1. **Years of Experience** (`years_of_experience`, rate 1-10):
   - 10 for 10+ years of relevant nursing experience.
   - Deduct points for less experience (e.g., 1-3 years = 3, 5-9 years = 7). The input gives the total in months.

2. **Healthcare Settings** (`healthcare_settings`, rate 1-5):
   - 5 for experience in relevant settings (e.g., hospital, ER, outpatient clinic).
   - Lower score for irrelevant settings or limited variety.

3. **Specialties** (`specialties`, rate 1-5):
   - 5 for relevant specialties (e.g., ICU, ER, oncology).
   - 1 for general practice only or irrelevant specialties.

4. **Leadership Roles** (`leadership_roles`, rate 1-5):
   - 5 for leadership positions (e.g., charge nurse, head nurse, nurse manager).
   - 1 if no leadership experience is listed.

For each criterion give a numeric `rating` and a short `comments` string explaining it. Then write `feedback` summarising the section and `suggestions` describing concrete improvements the candidate could make."#;

pub const TECHNICAL_SKILLS_RUBRIC: &str = r#"You will receive the skills and position descriptions of a nurse's resume in JSON format. Evaluate the "Technical Skills" against the criteria below and output the result in JSON format.

1. **Healthcare Software** (`software`, rate 1-5):
   - 5 for proficiency with EHR systems such as Epic or Cerner.
   - Deduct points for limited software experience.

2. **Medical Equipment** (`equipment`, rate 1-5):
   - 5 for experience handling advanced medical equipment (e.g., ventilators, infusion pumps, cardiac monitors).
   - 1 for basic or no equipment experience.

3. **Telemedicine** (`telemedicine`, rate 1-3):
   - 3 for extensive telemedicine experience.
   - 1 if no telemedicine experience is listed.

For each criterion give a numeric `rating` and a short `comments` string explaining it. Then write `feedback` summarising the section and `suggestions` describing concrete improvements the candidate could make."#;
