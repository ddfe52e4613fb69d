pub mod city_service;
