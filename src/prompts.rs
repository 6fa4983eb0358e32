//! Prompt construction for every completion-backed feature.
//!
//! User supplied text is embedded verbatim. Nothing here talks to the network,
//! so every builder is a plain function of its input.

use crate::models::{
    DietaryAdviceRequest, HealthInfo, HealthMetric, MealPlanRequest, MealSuggestionRequest,
};

/// System turn shared by the single-shot features
pub const NUTRITION_SYSTEM_MESSAGE: &str = "You are a nutrition and meal planning assistant.";

/// Section headers requested from the model for meal suggestions
pub const MEAL_SUGGESTION_SECTIONS: [&str; 4] = [
    "Recommended Meal:",
    "Main Ingredients:",
    "Nutritional Highlights:",
    "Preparation Tips:",
];

const NOT_PROVIDED: &str = "Not provided";
const NOT_SPECIFIED: &str = "Not specified";

pub fn build_meal_suggestion_prompt(req: &MealSuggestionRequest) -> String {
    let prompt = format!(
        "Suggest a {meal_type} meal based on the following details:\n\
         - Preferences: {preferences}\n\
         - Dietary restrictions: {restrictions}\n\
         - Health goal: {goal}\n\
         - Cuisine: {cuisine}\n\
         \n\
         Structure your answer in exactly these four sections:\n\
         Recommended Meal: the name of the dish and a one sentence description.\n\
         Main Ingredients: the key ingredients with approximate quantities.\n\
         Nutritional Highlights: why this meal supports the health goal.\n\
         Preparation Tips: short practical tips for cooking it.",
        meal_type = req.meal_type,
        preferences = req.preferences,
        restrictions = req.dietary_restrictions,
        goal = req.goal,
        cuisine = req.cuisine,
    );

    append_health_context(prompt, req.health_info.as_ref())
}

pub fn build_nutrition_analysis_prompt(meal: &str) -> String {
    format!(
        "Provide a nutritional analysis of the following meal: '{meal}'.\n\
         \n\
         Respond with a single JSON object and nothing else, following this structure exactly:\n\
         {{\n\
         \x20 \"macronutrients\": {{\"protein\": \"25 g\", \"carbohydrates\": \"40 g\", \"fat\": \"12 g\", \"fiber\": \"6 g\"}},\n\
         \x20 \"micronutrients\": {{\"vitamin_c\": \"15 mg\", \"iron\": \"3 mg\", \"calcium\": \"120 mg\"}},\n\
         \x20 \"caloric_information\": {{\"total_calories\": \"450 kcal\", \"calories_from_fat\": \"108 kcal\"}},\n\
         \x20 \"health_benefits\": [\"High in protein which supports muscle repair\"]\n\
         }}\n\
         Use realistic estimates for a typical single serving.",
        meal = meal,
    )
}

pub fn build_dietary_advice_prompt(req: &DietaryAdviceRequest) -> String {
    let prompt = format!(
        "Provide personalized dietary advice based on the following information:\n\
         - Health goal: {goal}\n\
         - Current diet: {current_diet}\n\
         - Activity level: {activity}\n\
         - Preferred meal types: {meal_types}\n\
         - Allergies: {allergies}\n\
         \n\
         Organize the advice in four parts:\n\
         1. Assessment of the current diet.\n\
         2. Recommended changes to reach the goal.\n\
         3. Foods to include and foods to avoid, respecting the allergies.\n\
         4. Practical daily habits.\n\
         Keep each point to one or two sentences.",
        goal = req.goal,
        current_diet = req.current_diet,
        activity = or_placeholder(&req.activity_level, NOT_SPECIFIED),
        meal_types = join_or(&req.preferred_meal_types, "Any"),
        allergies = join_or(&req.allergies, "None"),
    );

    append_health_context(prompt, req.health_info.as_ref())
}

pub fn build_meal_plan_prompt(req: &MealPlanRequest) -> String {
    let prompt = format!(
        "Create a {duration} meal plan for someone living in Singapore, using dishes and \
         ingredients that are easy to find locally.\n\
         - Preferences: {preferences}\n\
         - Dietary restrictions: {restrictions}\n\
         - Health goal: {goal}\n\
         - Activity level: {activity}\n\
         - Preferred cuisines: {cuisine}\n\
         - Meal types to include: {meal_types}\n\
         \n\
         For each day list Breakfast, Lunch and Dinner on separate lines, adding a Snack \
         only when it helps the goal. Give each meal a short name and its approximate calories.",
        duration = req.duration,
        preferences = req.preferences,
        restrictions = join_or(&req.dietary_restrictions, "None"),
        goal = req.goal,
        activity = or_placeholder(&req.activity_level, NOT_SPECIFIED),
        cuisine = join_or(&req.cuisine, "Any"),
        meal_types = join_or(&req.meal_types, "Any"),
    );

    append_health_context(prompt, req.health_info.as_ref())
}

/// Appends a biometric block when `health_info` carries anything; otherwise returns `prompt` as is
pub fn append_health_context(prompt: String, health_info: Option<&HealthInfo>) -> String {
    let info = match health_info {
        Some(info) if !info.is_empty() => info,
        _ => return prompt,
    };

    let metric = |value: &Option<HealthMetric>| {
        value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    };

    format!(
        "{prompt}\n\n\
         Consider the following health information:\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - Weight: {weight}\n\
         - Height: {height}\n\
         - Health conditions: {conditions}\n\
         Tailor the recommendations to this profile.",
        prompt = prompt,
        age = metric(&info.age),
        gender = info.gender.as_deref().unwrap_or(NOT_PROVIDED),
        weight = metric(&info.weight),
        height = metric(&info.height),
        conditions = join_or(&info.health_conditions, "None"),
    )
}

pub fn build_image_analysis_prompt() -> &'static str {
    IMAGE_ANALYSIS_PROMPT
}

const IMAGE_ANALYSIS_PROMPT: &str = "You are a nutrition expert analysing a photo of food. \
Identify every distinct food or drink item visible in the image, estimate the portion size of each \
item from visual cues such as plate size and utensils, and estimate its nutritional content for that \
portion. Cover Carbohydrates, Proteins, Fats, Vitamins, Minerals, Dietary fibre and Water for every item.

Rate each item with exactly one of these healthiness levels: \"Healthy\", \"Moderately healthy\" or \
\"Unhealthy\", and give a one sentence reason for the rating.

Respond with raw JSON only. Do not wrap the JSON in markdown code fences, do not add ```json, and do \
not write any text before or after the JSON. Use exactly this structure:
{
  \"introduction\": \"One or two sentences describing the meal as a whole.\",
  \"items\": [
    {
      \"name\": \"Grilled chicken breast\",
      \"portion\": \"about 150 g\",
      \"nutrients\": {
        \"carbohydrates\": \"0 g\",
        \"proteins\": \"46 g\",
        \"fats\": \"5 g\",
        \"vitamins\": \"Vitamin B6, Niacin\",
        \"minerals\": \"Phosphorus, Selenium\",
        \"dietary_fibre\": \"0 g\",
        \"water\": \"95 g\"
      },
      \"calories\": \"250 kcal\",
      \"healthiness\": {
        \"rating\": \"Healthy\",
        \"reason\": \"Lean protein with little fat.\"
      }
    }
  ],
  \"summary\": [
    \"Total estimated calories: 250 kcal\",
    \"A short suggestion to make the meal more balanced.\"
  ]
}
If the image does not contain food, return the same structure with an empty items array and explain \
this in the introduction.";

fn join_or(values: &[String], placeholder: &str) -> String {
    if values.is_empty() {
        placeholder.to_string()
    } else {
        values.join(", ")
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}
