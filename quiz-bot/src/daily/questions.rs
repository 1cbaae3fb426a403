//! Fixed catalog of daily interview questions.

use rand::seq::SliceRandom;

/// Built-in JavaScript / TypeScript interview questions.
const BUILTIN_QUESTIONS: &[&str] = &[
    "Какие существуют типы данных в JavaScript и как их объявлять?",
    "Что такое лексическая область видимости в JavaScript?",
    "Какие основные методы массивов существуют в JavaScript?",
    "Что такое объекты в JavaScript? Как работать с их свойствами?",
    "Что такое Map и Set в JavaScript и TypeScript и как их использовать?",
    "Чем отличаются function expression, function declaration, arrow function и IIFE?",
    "Что такое hoisting в JavaScript?",
    "Что такое замыкание (closure) и как оно работает?",
    "Как работает this в JavaScript?",
    "Как использовать Call, Bind и Apply?",
    "Что такое классы в JavaScript и как работают статические методы?",
    "Что такое Promise и как использовать async/await?",
    "Что такое Event Loop в JavaScript?",
    "Что такое очередь задач и микротаски?",
    "Какие способы выполнения асинхронного кода существуют?",
    "Что такое proto / prototype и как работает прототипное наследование?",
    "Как происходит приведение типов данных в JavaScript?",
    "Что такое каррирование и как его использовать?",
    "В чем разница между модулями и стандартным экспортом/импортом (ESM)?",
    "Что такое полифиллы и когда их используют?",
    "Что такое итераторы и как сделать объект итерируемым?",
    "Как написать полифил для forEach?",
    "Как работает сборщик мусора в JavaScript?",
];

/// Non-empty list of questions to draw from uniformly at random.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<String>,
}

impl QuestionCatalog {
    pub fn builtin() -> Self {
        Self {
            questions: BUILTIN_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        }
    }

    /// Custom catalog; blank entries are dropped. Returns `None` when nothing is left.
    pub fn new(questions: Vec<String>) -> Option<Self> {
        let questions: Vec<String> = questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        (!questions.is_empty()).then_some(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Picks one question uniformly at random.
    pub fn pick(&self) -> &str {
        self.pick_with(&mut rand::thread_rng())
    }

    pub fn pick_with<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.questions
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
