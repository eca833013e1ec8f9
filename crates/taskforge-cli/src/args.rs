//! Parsers for inline command line values.

use taskforge_core::{ConstraintKey, NewTask, Resource};

/// Parses `name:capacity[:skill,skill...]` into a resource.
pub fn parse_resource(s: &str) -> Result<Resource, String> {
    let mut parts = s.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(format!("missing resource name in '{s}'"));
    }
    let capacity = parts
        .next()
        .ok_or_else(|| format!("missing capacity in '{s}'"))?
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid capacity in '{s}': {e}"))?;
    let skills = parts.next().unwrap_or_default().split(',');
    Ok(Resource::new(name, capacity, skills))
}

/// Parses `name:duration[:skill[:resource]]` into a new task.
pub fn parse_task(s: &str) -> Result<NewTask, String> {
    let mut parts = s.splitn(4, ':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(format!("missing task name in '{s}'"));
    }
    let duration = parts
        .next()
        .ok_or_else(|| format!("missing duration in '{s}'"))?
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid duration in '{s}': {e}"))?;

    let mut task = NewTask::new(name, duration);
    if let Some(skill) = parts.next().map(str::trim).filter(|s| !s.is_empty()) {
        task = task.with_required_skill(skill);
    }
    if let Some(resource) = parts.next().map(str::trim).filter(|s| !s.is_empty()) {
        task = task.with_resource(resource);
    }
    Ok(task)
}

/// Parses `constraint=weight`, accepting snake_case or camelCase keys.
pub fn parse_weight(s: &str) -> Result<(ConstraintKey, i32), String> {
    let (key, weight) = s
        .split_once('=')
        .ok_or_else(|| format!("expected constraint=weight, got '{s}'"))?;
    let key = key.trim().parse::<ConstraintKey>().map_err(|e| e.to_string())?;
    let weight = weight
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid weight in '{s}': {e}"))?;
    Ok((key, weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resource() {
        let resource = parse_resource("Dave:90:Rust, Go").unwrap();
        assert_eq!(resource.name, "Dave");
        assert_eq!(resource.capacity, 90);
        assert!(resource.has_skill("rust"));
        assert!(resource.has_skill("go"));

        let bare = parse_resource("Erin:40").unwrap();
        assert!(bare.skills.is_empty());

        assert!(parse_resource(":40").is_err());
        assert!(parse_resource("Erin").is_err());
        assert!(parse_resource("Erin:lots").is_err());
    }

    #[test]
    fn test_parse_task() {
        let task = parse_task("Deploy:25:devops:Bob").unwrap();
        assert_eq!(task.name, "Deploy");
        assert_eq!(task.duration, 25);
        assert_eq!(task.required_skill, "devops");
        assert_eq!(task.resource.as_deref(), Some("Bob"));

        let plain = parse_task("Review:10").unwrap();
        assert_eq!(plain.required_skill, "");
        assert!(plain.resource.is_none());

        assert!(parse_task("Review").is_err());
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(
            parse_weight("balance_load=0").unwrap(),
            (ConstraintKey::BalanceLoad, 0)
        );
        assert_eq!(
            parse_weight("requiredSkill = 150").unwrap(),
            (ConstraintKey::RequiredSkill, 150)
        );
        assert!(parse_weight("speed=3").is_err());
        assert!(parse_weight("balance_load").is_err());
    }
}
