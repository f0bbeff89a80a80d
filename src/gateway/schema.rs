//! Output-shape descriptors sent alongside each instruction, in the
//! OpenAPI-subset form the hosted `generateContent` endpoint accepts.

use serde_json::{json, Value};

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn number() -> Value {
    json!({ "type": "NUMBER" })
}

fn strings() -> Value {
    json!({ "type": "ARRAY", "items": string() })
}

fn tlo() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "action": {
                "type": "STRING",
                "description": "Bloom's Taxonomy Level 5 (Synthesis) or above action verb."
            },
            "condition": string(),
            "standard": string()
        },
        "required": ["action", "condition", "standard"]
    })
}

pub fn course_structure() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": string(),
            "courseNumber": string(),
            "schoolName": string(),
            "description": string(),
            "totalDuration": number(),
            "references": strings(),
            "lessons": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": string(),
                        "title": string(),
                        "durationHours": number(),
                        "tlo": tlo(),
                        "elos": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": { "id": string(), "title": string() },
                                "required": ["id", "title"]
                            }
                        }
                    },
                    "required": ["id", "title", "durationHours", "tlo", "elos"]
                }
            }
        },
        "required": ["title", "description", "totalDuration", "lessons", "references"]
    })
}

fn practical_exercise() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": string(),
            "type": {
                "type": "STRING",
                "enum": ["Simulation", "Hands-on", "Team Scenario", "Individual Job Aid", "Role Play"]
            },
            "description": string(),
            "steps": strings(),
            "scoringCriteria": strings()
        }
    })
}

fn learning_step_activity() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": string(),
            "timeMinutes": number(),
            "method": {
                "type": "STRING",
                "enum": ["Lecture", "Practical Exercise", "Discussion", "Demonstration", "Role Play"]
            },
            "description": string(),
            "guidance": {
                "type": "STRING",
                "description": "Detailed step-by-step guidance adhering to the Experiential Learning Model (ELM)."
            },
            "practicalExercise": practical_exercise(),
            "checkOnLearning": {
                "type": "OBJECT",
                "properties": { "question": string(), "answer": string() }
            }
        },
        "required": ["title", "timeMinutes", "method", "description", "guidance"]
    })
}

pub fn lesson_detail() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "scope": string(),
            "prerequisites": string(),
            "instructorQualifications": string(),
            "safetyConsiderations": string(),
            "summary": string(),
            "media": string(),
            "ratio": { "type": "STRING", "description": "Instructor to Student Ratio" },
            "script": string(),
            "armyRegulations": strings(),
            "elos": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": string(),
                        "title": string(),
                        "learningStepActivities": { "type": "ARRAY", "items": learning_step_activity() }
                    },
                    "required": ["id", "title", "learningStepActivities"]
                }
            },
            "slides": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": string(),
                        "title": string(),
                        "bulletPoints": strings(),
                        "instructorNotes": string()
                    },
                    "required": ["id", "title", "bulletPoints", "instructorNotes"]
                }
            }
        },
        "required": ["script", "elos", "slides", "scope", "summary"]
    })
}

fn test_version() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "purpose": string(),
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": {
                            "type": "STRING",
                            "enum": [
                                "Multiple Choice",
                                "Complex Multiple Choice",
                                "Short Answer Essay",
                                "True/False",
                                "Fill in the Blank"
                            ]
                        },
                        "question": string(),
                        "options": strings(),
                        "answer": string(),
                        "rubric": string(),
                        "bloomLevel": { "type": "STRING", "enum": ["K1", "K2", "K3", "K4"] }
                    },
                    "required": ["type", "question", "answer", "bloomLevel"]
                }
            }
        },
        "required": ["purpose", "items"]
    })
}

pub fn course_tests() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "diagnostic": test_version(),
            "formative": test_version(),
            "summative": test_version()
        },
        "required": ["diagnostic", "formative", "summative"]
    })
}
