use crate::device_input::interface::InputEvent;
use crate::error::ClassifierError;
use crate::image_classifier::interface::Prediction;
use crate::model_loader::metadata::LabelMetadata;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelStatus {
    #[default]
    Idle,
    LoadingModel,
    Predicting,
    Ready,
    Error,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Idle => "idle",
            ModelStatus::LoadingModel => "loading-model",
            ModelStatus::Predicting => "predicting",
            ModelStatus::Ready => "ready",
            ModelStatus::Error => "error",
        }
    }

    pub fn to_display_string(&self) -> String {
        match self {
            ModelStatus::Idle => "Idle",
            ModelStatus::LoadingModel => "Loading model...",
            ModelStatus::Predicting => "Predicting...",
            ModelStatus::Ready => "Ready",
            ModelStatus::Error => "Error",
        }
        .to_string()
    }
}

/// How many classes the loaded metadata names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelCount {
    /// No metadata document was loaded.
    #[default]
    Unavailable,
    /// A document was loaded but has no labels array.
    Unknown,
    Known(usize),
}

impl LabelCount {
    pub fn from_metadata(metadata: Option<&LabelMetadata>) -> Self {
        match metadata {
            None => LabelCount::Unavailable,
            Some(metadata) => match metadata.label_count() {
                Some(count) => LabelCount::Known(count),
                None => LabelCount::Unknown,
            },
        }
    }

    pub fn to_display_string(&self) -> String {
        match self {
            LabelCount::Unavailable => "labels N/A".to_string(),
            LabelCount::Unknown => "? classes".to_string(),
            LabelCount::Known(count) => format!("{} classes", count),
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct SelectedImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedImage")
            .field("path", &self.path)
            .field("bytes", &format!("{} bytes", self.bytes.len()))
            .finish()
    }
}

/// What the user asked for when pressing classify.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRequest {
    pub image: Option<Vec<u8>>,
    pub consent: bool,
}

impl ClassificationRequest {
    /// Missing image is reported before missing consent.
    pub fn validate(self) -> Result<Vec<u8>, ClassifierError> {
        let image = self.image.ok_or(ClassifierError::MissingImage)?;
        if !self.consent {
            return Err(ClassifierError::MissingConsent);
        }
        Ok(image)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub status: ModelStatus,
    pub loading: bool,
    pub image: Option<SelectedImage>,
    pub consent: bool,
    pub predictions: Vec<Prediction>,
    pub label_count: LabelCount,
    pub alert: Option<String>,
    pub closed: bool,
}

impl State {
    pub fn is_done(&self) -> bool {
        self.closed && !self.loading
    }

    fn with_alert(self, error: &ClassifierError) -> Self {
        State {
            alert: Some(error.alert_message()),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ImageSelected(PathBuf),
    ImageReadDone {
        path: PathBuf,
        result: Result<Vec<u8>, String>,
    },
    ConsentChanged(bool),
    ClassifyClicked,
    EnterPressed,
    AlertDismissed,
    ModelLoadDone(Result<LabelCount, ClassifierError>),
    ClassifyDone(Result<Vec<Prediction>, ClassifierError>),
    InputClosed,
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::ImageReadDone {
                path,
                result: Ok(bytes),
            } => format!("ImageReadDone({:?}, {} bytes)", path, bytes.len()),
            event => format!("{:?}", event),
        }
    }
}

impl From<InputEvent> for Event {
    fn from(event: InputEvent) -> Self {
        match event {
            InputEvent::ImageSelected(path) => Event::ImageSelected(path),
            InputEvent::ConsentChanged(consent) => Event::ConsentChanged(consent),
            InputEvent::ClassifyClicked => Event::ClassifyClicked,
            InputEvent::EnterPressed => Event::EnterPressed,
            InputEvent::AlertDismissed => Event::AlertDismissed,
        }
    }
}

#[derive(Clone, PartialEq)]
pub enum Effect {
    SubscribeToInput,
    ReadImage { path: PathBuf },
    LoadModel,
    Classify { image: Vec<u8> },
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::SubscribeToInput => "SubscribeToInput".to_string(),
            Effect::ReadImage { path } => format!("ReadImage({:?})", path),
            Effect::LoadModel => "LoadModel".to_string(),
            Effect::Classify { image } => format!("Classify({} bytes)", image.len()),
        }
    }
}

pub fn init() -> (State, Vec<Effect>) {
    (State::default(), vec![Effect::SubscribeToInput])
}

fn start_classification(state: State) -> (State, Vec<Effect>) {
    (
        State {
            status: ModelStatus::LoadingModel,
            loading: true,
            ..state
        },
        vec![Effect::LoadModel],
    )
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    match event {
        Event::ImageSelected(path) => (state, vec![Effect::ReadImage { path }]),

        Event::ImageReadDone {
            path,
            result: Ok(bytes),
        } => (
            State {
                image: Some(SelectedImage { path, bytes }),
                predictions: vec![],
                status: if state.loading {
                    state.status
                } else {
                    ModelStatus::Idle
                },
                ..state
            },
            vec![],
        ),
        Event::ImageReadDone {
            result: Err(message),
            ..
        } => (state.with_alert(&ClassifierError::Decode(message)), vec![]),

        Event::ConsentChanged(consent) => (State { consent, ..state }, vec![]),

        Event::ClassifyClicked => {
            if state.loading {
                return (state, vec![]);
            }
            let request = ClassificationRequest {
                image: state.image.as_ref().map(|image| image.bytes.clone()),
                consent: state.consent,
            };
            match request.validate() {
                Ok(_) => start_classification(state),
                Err(e) => (state.with_alert(&e), vec![]),
            }
        }

        // Enter skips the loading guard but never alerts.
        Event::EnterPressed => {
            if state.image.is_some() && state.consent {
                start_classification(state)
            } else {
                (state, vec![])
            }
        }

        Event::ModelLoadDone(Ok(label_count)) => match state.image.as_ref() {
            Some(image) => {
                let image = image.bytes.clone();
                (
                    State {
                        status: ModelStatus::Predicting,
                        label_count,
                        ..state
                    },
                    vec![Effect::Classify { image }],
                )
            }
            None => (
                State {
                    status: ModelStatus::Error,
                    loading: false,
                    label_count,
                    ..state
                }
                .with_alert(&ClassifierError::MissingImage),
                vec![],
            ),
        },
        Event::ModelLoadDone(Err(e)) => (
            State {
                status: ModelStatus::Error,
                loading: false,
                ..state
            }
            .with_alert(&e),
            vec![],
        ),

        Event::ClassifyDone(Ok(predictions)) => (
            State {
                status: ModelStatus::Ready,
                loading: false,
                predictions,
                ..state
            },
            vec![],
        ),
        Event::ClassifyDone(Err(e)) => {
            let predictions = match e {
                ClassifierError::Decode(_) => vec![],
                _ => state.predictions.clone(),
            };
            (
                State {
                    status: ModelStatus::Error,
                    loading: false,
                    predictions,
                    ..state
                }
                .with_alert(&e),
                vec![],
            )
        }

        Event::AlertDismissed => (State { alert: None, ..state }, vec![]),

        Event::InputClosed => (
            State {
                closed: true,
                ..state
            },
            vec![],
        ),
    }
}
