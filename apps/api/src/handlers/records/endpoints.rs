use clinica_application::RecordService;
use clinica_core::AppResult;
use clinica_domain::{Client, ClientProfile, Exam, ExamProfile, Patient, PatientProfile};

use crate::dto::{
    ClientRequest, ClientResponse, ExamRequest, ExamResponse, PatientRequest, PatientResponse,
};
use crate::state::AppState;

use super::RecordEndpoint;

impl RecordEndpoint for Client {
    type Request = ClientRequest;
    type Response = ClientResponse;

    fn service(state: &AppState) -> &RecordService<Self> {
        &state.client_service
    }

    fn profile(request: Self::Request) -> AppResult<ClientProfile> {
        ClientProfile::try_from(request)
    }
}

impl RecordEndpoint for Patient {
    type Request = PatientRequest;
    type Response = PatientResponse;

    fn service(state: &AppState) -> &RecordService<Self> {
        &state.patient_service
    }

    fn profile(request: Self::Request) -> AppResult<PatientProfile> {
        PatientProfile::try_from(request)
    }
}

impl RecordEndpoint for Exam {
    type Request = ExamRequest;
    type Response = ExamResponse;

    fn service(state: &AppState) -> &RecordService<Self> {
        &state.exam_service
    }

    fn profile(request: Self::Request) -> AppResult<ExamProfile> {
        ExamProfile::try_from(request)
    }
}
